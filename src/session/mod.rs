/// 会话系统 (Session)
///
/// 单线程访问, 所有修改点集中在命令解释器与帧率统计
/// - state:   阈值/暂停/统计开关/FPS
/// - history: 固定容量检测历史
/// - fps:     窗口化帧率统计
/// - command: 按键 → 状态修改
pub mod command;
pub mod fps;
pub mod history;
pub mod state;

pub use command::{interpret, Command, Flow, CONTROLS};
pub use fps::FpsMeter;
pub use history::{DetectionHistory, HistoryEntry, HISTORY_CAPACITY};
pub use state::SessionState;
