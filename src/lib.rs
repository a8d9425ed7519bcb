pub mod config; // 命令行参数
pub mod detection; // 检测结果与类别表
pub mod error; // 错误类型
pub mod input; // 视频输入系统
pub mod models; // 模型接口与具体实现
pub mod pipeline; // 主循环
pub mod renderer; // 叠加层合成与窗口显示
pub mod session; // 会话状态与按键命令
pub mod ui_config; // JSON 界面配置

pub use crate::config::Args;
pub use crate::detection::{BBox, ClassNames, Detection, Detector, RawDetection};
pub use crate::error::{AngelError, Result};
pub use crate::pipeline::{Display, HeadlessDisplay, Pipeline};
pub use crate::renderer::{Overlay, TextPainter};
pub use crate::session::{Flow, SessionState};
pub use crate::ui_config::UiConfig;

/// 启动时打印的控制说明
pub fn controls_banner() -> String {
    let mut text = String::from("Controls:");
    for (key, action) in session::CONTROLS {
        text.push_str(&format!("\n  {} - {}", key, action));
    }
    text
}
