//! 检测器 (Detector)
//! 职责: 帧 + 阈值 → 检测模型 → 校验后的检测结果
//!
//! 模型报错只影响当前帧: 记录日志并返回空结果

use std::time::Instant;

use image::RgbImage;

use super::{resolve, ClassNames, Detection};
use crate::error::AngelError;
use crate::models::DetectModel;

pub struct Detector {
    model: Option<Box<dyn DetectModel>>,
    class_names: ClassNames,

    // 统计
    count: u64,
    failures: u64,
    last_inference_ms: f64,
    last_error: Option<AngelError>,
}

impl Detector {
    pub fn new(model: Box<dyn DetectModel>, class_names: ClassNames) -> Self {
        log::info!("🔍 检测模块启动: {}", model.name());
        Self {
            model: Some(model),
            class_names,
            count: 0,
            failures: 0,
            last_inference_ms: 0.0,
            last_error: None,
        }
    }

    /// 无模型: 本次会话检测结果恒为空
    pub fn disabled(class_names: ClassNames) -> Self {
        log::warn!("⚠️ 模型不可用, 界面将在无检测的情况下运行");
        Self {
            model: None,
            class_names,
            count: 0,
            failures: 0,
            last_inference_ms: 0.0,
            last_error: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// 已执行的推理次数
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_inference_ms(&self) -> f64 {
        self.last_inference_ms
    }

    /// 最近一次失败 (之后成功也保留)
    pub fn last_error(&self) -> Option<&AngelError> {
        self.last_error.as_ref()
    }

    /// 会话结束时打印的统计
    pub fn summary(&self) -> String {
        if !self.is_enabled() {
            return format!("检测关闭 | 类别 {}", self.class_names.len());
        }
        let mut text = format!(
            "推理 {} 次 | 失败 {} 次 | 最近耗时 {:.1}ms | 类别 {}",
            self.count,
            self.failures,
            self.last_inference_ms,
            self.class_names.len()
        );
        if let Some(e) = &self.last_error {
            text.push_str(&format!(" | 最近错误: {}", e));
        }
        text
    }

    pub fn detect(&mut self, frame: &RgbImage, threshold: f32) -> Vec<Detection> {
        let Some(model) = self.model.as_mut() else {
            return Vec::new();
        };

        let t0 = Instant::now();
        let result = model.detect(frame, threshold);
        self.last_inference_ms = t0.elapsed().as_secs_f64() * 1000.0;
        self.count += 1;

        match result {
            Ok(raw) => resolve(raw, &self.class_names),
            Err(e) => {
                self.failures += 1;
                let err = AngelError::Detection(format!("{:#}", e));
                log::warn!("⚠️ {}", err);
                self.last_error = Some(err);
                Vec::new()
            }
        }
    }
}
