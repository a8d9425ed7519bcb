//! 检测模型接口与实现
//!
//! # 架构说明
//!
//! 检测模型对主循环是不透明的协作者: 输入一帧图像与置信度阈值,
//! 输出若干 `(class_id, confidence, box)`。
//!
//! ## DetectModel Trait
//! 统一的模型接口, 任何后端 (ONNX Runtime 等) 都实现此 trait
//!
//! ## 后处理 (Postprocess)
//! - 预测解码与 NMS 与后端无关, 见 `postprocess.rs`
//!
//! ## 使用示例
//! ```no_run
//! use angeleyes::models;
//!
//! let model = models::load("models/yolov8n.onnx");
//! if model.is_err() {
//!     // 降级: 本次会话禁用检测
//! }
//! ```
use std::path::Path;

use image::RgbImage;

use crate::detection::RawDetection;
use crate::error::{AngelError, Result};

pub mod postprocess;
#[cfg(feature = "onnx")]
pub mod yolov8;

pub use postprocess::{decode_predictions, non_max_suppression};
#[cfg(feature = "onnx")]
pub use yolov8::YOLOv8;

/// 模型类型枚举 (从文件扩展名识别)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// YOLOv8 ONNX 导出模型
    YOLOv8Onnx,
    /// 不支持的格式
    Unknown,
}

impl ModelType {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("onnx") => ModelType::YOLOv8Onnx,
            _ => ModelType::Unknown,
        }
    }

    /// 推荐的NMS IOU阈值
    pub fn default_iou_threshold(&self) -> f32 {
        0.45
    }
}

/// 统一的检测模型接口
///
/// ```text
/// 原始帧 + 阈值 → detect → Vec<RawDetection>
/// ```
pub trait DetectModel {
    /// 执行一次检测; 返回的错误视为单帧的临时失败
    fn detect(&mut self, frame: &RgbImage, conf_threshold: f32) -> anyhow::Result<Vec<RawDetection>>;

    /// 模型名称 (日志用)
    fn name(&self) -> &str;
}

/// 加载检测模型
///
/// 模型文件缺失或当前构建不含对应后端时返回 `ConfigMissing`,
/// 调用方据此禁用检测
pub fn load<P: AsRef<Path>>(path: P) -> Result<Box<dyn DetectModel>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AngelError::config_missing(format!(
            "model file {} not found",
            path.display()
        )));
    }

    match ModelType::from_path(path) {
        ModelType::YOLOv8Onnx => load_onnx(path),
        ModelType::Unknown => Err(AngelError::config_missing(format!(
            "unsupported model format: {}",
            path.display()
        ))),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Box<dyn DetectModel>> {
    let model = YOLOv8::new(path)
        .map_err(|e| AngelError::config_missing(format!("failed to load {}: {:#}", path.display(), e)))?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<Box<dyn DetectModel>> {
    Err(AngelError::config_missing(format!(
        "{} requires the `onnx` feature",
        path.display()
    )))
}
