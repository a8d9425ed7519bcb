// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 后处理: 预测解码 + 非极大值抑制
//!
//! YOLOv8 检测头输出 `[1, 4 + nc, N]`, 每列为 `(cx, cy, w, h, score_0..score_nc)`,
//! 坐标位于 letterbox 后的输入空间

use crate::detection::RawDetection;

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let l = a[0].max(b[0]);
    let r = (a[0] + a[2]).min(b[0] + b[2]);
    let t = a[1].max(b[1]);
    let btm = (a[1] + a[3]).min(b[1] + b[3]);
    let inter = (r - l).max(0.) * (btm - t).max(0.);
    let union = a[2] * a[3] + b[2] * b[3] - inter;
    if union <= 0. {
        0.
    } else {
        inter / union
    }
}

/// 按置信度降序的贪心NMS, 同类与不同类一起抑制
pub fn non_max_suppression(xs: &mut Vec<RawDetection>, iou_threshold: f32) {
    xs.sort_by(|b1, b2| b2.confidence.total_cmp(&b1.confidence));

    let mut current_index = 0;
    for index in 0..xs.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            if iou(&xs[prev_index].bbox, &xs[index].bbox) > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            xs.swap(current_index, index);
            current_index += 1;
        }
    }
    xs.truncate(current_index);
}

/// 解码检测头输出
///
/// * `data` - 行优先 `[4 + num_classes, num_preds]`
/// * `ratio` - letterbox 缩放比例 (输入尺寸 / 原图尺寸)
/// * `frame_size` - 原图 (宽, 高), 用于裁剪
pub fn decode_predictions(
    data: &[f32],
    num_classes: usize,
    num_preds: usize,
    ratio: f32,
    frame_size: (u32, u32),
    conf_threshold: f32,
) -> Vec<RawDetection> {
    const CXYWH_OFFSET: usize = 4;
    let rows = CXYWH_OFFSET + num_classes;
    if data.len() < rows * num_preds || ratio <= 0. {
        return Vec::new();
    }
    let (w0, h0) = (frame_size.0 as f32, frame_size.1 as f32);
    let at = |row: usize, col: usize| data[row * num_preds + col];

    let mut out = Vec::new();
    for i in 0..num_preds {
        let (id, confidence) = (0..num_classes)
            .map(|c| (c, at(CXYWH_OFFSET + c, i)))
            .fold((0, f32::MIN), |max, x| if x.1 > max.1 { x } else { max });

        if confidence < conf_threshold {
            continue;
        }

        let cx = at(0, i) / ratio;
        let cy = at(1, i) / ratio;
        let w = at(2, i) / ratio;
        let h = at(3, i) / ratio;
        let x = (cx - w / 2.).clamp(0., w0);
        let y = (cy - h / 2.).clamp(0., h0);
        let w = w.min(w0 - x);
        let h = h.min(h0 - y);

        // 类别表从1开始计数
        out.push(RawDetection::new(
            id as i32 + 1,
            confidence.clamp(0., 1.),
            [x, y, w, h],
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nms_drops_overlapping() {
        let mut xs = vec![
            RawDetection::new(1, 0.6, [0., 0., 10., 10.]),
            RawDetection::new(1, 0.9, [1., 1., 10., 10.]),
            RawDetection::new(2, 0.5, [50., 50., 10., 10.]),
        ];
        non_max_suppression(&mut xs, 0.45);
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].confidence, 0.9);
        assert_eq!(xs[1].class_id, 2);
    }

    #[test]
    fn test_decode_predictions() {
        // 2 classes, 3 predictions
        let num_preds = 3;
        #[rustfmt::skip]
        let data = vec![
            // cx
            20., 100., 60.,
            // cy
            20., 100., 60.,
            // w
            10., 20., 8.,
            // h
            10., 20., 8.,
            // class 0
            0.9, 0.1, 0.2,
            // class 1
            0.05, 0.7, 0.1,
        ];
        let ys = decode_predictions(&data, 2, num_preds, 0.5, (640, 480), 0.5);
        assert_eq!(ys.len(), 2);
        assert_eq!(ys[0].class_id, 1);
        assert_eq!(ys[0].bbox, [30., 30., 20., 20.]);
        assert_eq!(ys[1].class_id, 2);
        assert_eq!(ys[1].confidence, 0.7);
        assert_eq!(ys[1].bbox, [180., 180., 40., 40.]);
    }

    #[test]
    fn test_decode_short_buffer_is_empty() {
        assert!(decode_predictions(&[0.; 5], 2, 3, 1., (10, 10), 0.1).is_empty());
    }
}
