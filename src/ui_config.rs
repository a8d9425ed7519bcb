//! 界面配置 - 通过JSON文件调整参数

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::renderer::overlay::DEFAULT_TITLE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub confidence_threshold: f32, // 初始置信度阈值
    pub show_stats: bool,          // 是否显示底部统计栏
    pub window_title: String,
    pub font_path: Option<PathBuf>, // 为空时使用内置字体
    pub frame_timeout_ms: u64,      // 采集超时
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            show_stats: true,
            window_title: DEFAULT_TITLE.to_string(),
            font_path: None,
            frame_timeout_ms: 5000,
        }
    }
}

impl UiConfig {
    /// 从JSON文件加载配置; 文件不存在时写入默认配置, 解析失败时使用默认值
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("✅ 配置已从 {} 加载", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    log::error!("❌ 保存配置失败: {}", e);
                }
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("💾 配置已保存到 {}", path.as_ref().display());
        Ok(())
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        log::info!("🎛️  当前配置:");
        log::info!("  置信度阈值: {:.2}", self.confidence_threshold);
        log::info!("  统计栏: {}", if self.show_stats { "ON" } else { "OFF" });
        log::info!("  采集超时: {}ms", self.frame_timeout_ms);
        if let Some(font) = &self.font_path {
            log::info!("  字体: {}", font.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angeleyes.json");
        let config = UiConfig::load(&path);
        assert_eq!(config, UiConfig::default());
        assert!(path.exists());
        assert_eq!(UiConfig::load(&path), UiConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angeleyes.json");
        fs::write(&path, r#"{ "confidence_threshold": 0.7, "show_stats": false }"#).unwrap();
        let config = UiConfig::load(&path);
        assert_eq!(config.confidence_threshold, 0.7);
        assert!(!config.show_stats);
        assert_eq!(config.frame_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_bad_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angeleyes.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(UiConfig::load(&path), UiConfig::default());
        // 不覆盖用户文件
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
