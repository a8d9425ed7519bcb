use std::path::PathBuf;

use clap::Parser;

/// 默认输入源: 带 `camera` feature 时为第一个摄像头, 否则回放 `frames/` 目录
#[cfg(feature = "camera")]
pub const DEFAULT_SOURCE: &str = "camera:0";
#[cfg(not(feature = "camera"))]
pub const DEFAULT_SOURCE: &str = "frames";

/// AngelEyes 实时检测
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "AngelEyes - 实时目标检测叠加显示", long_about = None)]
pub struct Args {
    /// 输入源: camera:N / 摄像头序号 (需要 `camera` feature) / 图片文件或目录
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// ONNX 检测模型
    #[arg(short, long, default_value = "models/yolov8n.onnx")]
    pub model: PathBuf,

    /// 类别名称文件 (每行一个)
    #[arg(short, long, default_value = "coco.names")]
    pub classes: PathBuf,

    /// JSON 配置文件 (不存在时写入默认值)
    #[arg(long, default_value = "angeleyes.json")]
    pub config: PathBuf,

    /// 采集宽度
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// 采集高度
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// 初始置信度阈值 (覆盖配置文件)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// 无窗口运行
    #[arg(long)]
    pub headless: bool,

    /// 最多处理帧数 (无窗口模式)
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// 保存最后一帧 (PNG, 无窗口模式)
    #[arg(long)]
    pub save: Option<PathBuf>,
}
