//! 错误类型 (Error kinds)
//!
//! - Acquisition:   视频源不可用, 主循环终止
//! - Detection:     单帧检测失败, 按空结果处理
//! - ConfigMissing: 启动时缺少配置 (类别表/模型), 降级运行

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AngelError>;

#[derive(Error, Debug)]
pub enum AngelError {
    #[error("frame acquisition failed: {0}")]
    Acquisition(String),

    #[error("detection failed: {0}")]
    Detection(String),

    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("display error: {0}")]
    Display(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AngelError {
    pub fn acquisition<S: Into<String>>(msg: S) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn config_missing<S: Into<String>>(msg: S) -> Self {
        Self::ConfigMissing(msg.into())
    }

    /// 是否需要终止主循环
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Acquisition(_) | Self::Display(_))
    }
}
