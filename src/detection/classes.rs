//! 类别名称表 (Class-name list)

use std::fs;
use std::path::Path;

/// 类别文件缺失时的默认类别
pub const DEFAULT_CLASSES: [&str; 5] = ["person", "bicycle", "car", "motorcycle", "airplane"];

#[derive(Clone, Debug, PartialEq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// 从文本文件加载 (每行一个类别), 失败时退回默认类别
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let names = Self::parse(&text);
                log::info!("✅ 类别表已从 {} 加载 ({} 类)", path.display(), names.len());
                Self { names }
            }
            Err(e) => {
                log::warn!(
                    "⚠️ 类别文件 {} 不可用 ({}), 使用默认类别",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn parse(text: &str) -> Vec<String> {
        text.trim_end_matches(['\n', '\r'])
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }

    /// 按1起始的 class_id 查找类别名
    pub fn get(&self, class_id: i32) -> Option<&str> {
        let idx = usize::try_from(class_id.checked_sub(1)?).ok()?;
        self.names.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
