//! 按键命令解释器 (Command interpreter)
//!
//! 每次迭代最多消费一个按键; 无按键或未知按键均为空操作

use phf::phf_map;

use super::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleStats,
    TogglePause,
    ClearHistory,
    IncreaseThreshold,
    DecreaseThreshold,
}

/// 按键映射 (字母不区分大小写, 查表前统一转小写)
static KEY_COMMANDS: phf::Map<char, Command> = phf_map! {
    'q' => Command::Quit,
    's' => Command::ToggleStats,
    'p' => Command::TogglePause,
    'r' => Command::ClearHistory,
    '+' => Command::IncreaseThreshold,
    '=' => Command::IncreaseThreshold,
    '-' => Command::DecreaseThreshold,
};

/// 控制说明 (启动时打印)
pub const CONTROLS: [(&str, &str); 6] = [
    ("Q", "Quit"),
    ("S", "Toggle Statistics"),
    ("P", "Pause/Resume"),
    ("R", "Reset Detection History"),
    ("+", "Increase Threshold"),
    ("-", "Decrease Threshold"),
];

impl Command {
    pub fn from_key(key: char) -> Option<Command> {
        KEY_COMMANDS.get(&key.to_ascii_lowercase()).copied()
    }
}

/// 主循环是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 将一个按键作用到会话状态上
pub fn interpret(key: Option<char>, state: &mut SessionState) -> Flow {
    match key.and_then(Command::from_key) {
        Some(cmd) => execute(cmd, state),
        None => Flow::Continue,
    }
}

pub fn execute(cmd: Command, state: &mut SessionState) -> Flow {
    match cmd {
        Command::Quit => return Flow::Quit,
        Command::ToggleStats => {
            state.toggle_stats();
            log::info!("Statistics: {}", if state.show_stats() { "ON" } else { "OFF" });
        }
        Command::TogglePause => {
            state.toggle_pause();
            log::info!("{}", if state.paused() { "Paused" } else { "Resumed" });
        }
        Command::ClearHistory => {
            state.clear_history();
            log::info!("Detection history cleared");
        }
        Command::IncreaseThreshold => {
            state.increase_threshold();
            log::info!("Threshold increased to {:.2}", state.threshold());
        }
        Command::DecreaseThreshold => {
            state.decrease_threshold();
            log::info!("Threshold decreased to {:.2}", state.threshold());
        }
    }
    Flow::Continue
}
