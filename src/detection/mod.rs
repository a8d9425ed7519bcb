/// 检测系统 (Detection System)
///
/// - types:    检测数据结构与校验
/// - classes:  类别名称表
/// - detector: 检测源封装 (失败降级为空结果)
pub mod classes;
pub mod detector;
pub mod types;

pub use classes::ClassNames;
pub use detector::Detector;
pub use types::{BBox, Detection, InvalidDetection, RawDetection};

/// 原始输出 → 已校验检测, 丢弃未知类别与非法条目 (保持输入顺序)
pub fn resolve(raw: Vec<RawDetection>, names: &ClassNames) -> Vec<Detection> {
    raw.into_iter()
        .filter_map(|r| {
            let Some(name) = names.get(r.class_id) else {
                log::debug!("丢弃未知类别 class_id={}", r.class_id);
                return None;
            };
            match Detection::new(BBox::from_xywh(r.bbox), name, r.confidence, r.class_id) {
                Ok(d) => Some(d),
                Err(e) => {
                    log::debug!("丢弃非法检测 {}: {}", name, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_filters_and_keeps_order() {
        let names = ClassNames::new(vec!["cat".into(), "dog".into()]);
        let raw = vec![
            RawDetection::new(2, 0.8, [0., 0., 10., 10.]),
            RawDetection::new(3, 0.9, [0., 0., 10., 10.]), // 未知类别
            RawDetection::new(1, 0.7, [5., 5., 0., 10.]),  // 宽度为0
            RawDetection::new(1, 1.5, [5., 5., 10., 10.]), // 置信度越界
            RawDetection::new(1, 0.6, [5., 5., 10., 10.]),
        ];
        let ds = resolve(raw, &names);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].class_name(), "dog");
        assert_eq!(ds[1].class_name(), "cat");
        assert_eq!(ds[1].bbox(), &BBox::new(5, 5, 10, 10));
    }
}
