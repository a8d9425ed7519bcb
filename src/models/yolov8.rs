// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

// YOLOv8 ONNX 检测模型
// 包含: 模型加载、预处理 (letterbox)、推理、后处理

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::Array;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use super::postprocess::{decode_predictions, non_max_suppression};
use super::{DetectModel, ModelType};
use crate::detection::RawDetection;

/// YOLOv8推理输入尺寸
pub const INF_SIZE: u32 = 640;

/// YOLOv8 检测模型
pub struct YOLOv8 {
    session: Session,
    name: String,
    width: u32,
    height: u32,
    iou: f32,
}

impl YOLOv8 {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let session = Session::builder()
            .context("failed to create ORT session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("failed to set optimization level")?
            .commit_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("yolov8")
            .to_string();

        log::info!("✅ YOLOv8 检测模型加载成功: {}", path.display());

        Ok(Self {
            session,
            name,
            width: INF_SIZE,
            height: INF_SIZE,
            iou: ModelType::YOLOv8Onnx.default_iou_threshold(),
        })
    }

    fn scale_wh(&self, w0: f32, h0: f32) -> (f32, f32, f32) {
        let r = (self.width as f32 / w0).min(self.height as f32 / h0);
        (r, (w0 * r).round(), (h0 * r).round())
    }

    /// letterbox 缩放 + 归一化, 输出 NCHW
    fn preprocess(&self, frame: &RgbImage) -> (Array<f32, ndarray::Ix4>, f32) {
        let (ratio, w_new, h_new) = self.scale_wh(frame.width() as f32, frame.height() as f32);
        let resized =
            image::imageops::resize(frame, w_new as u32, h_new as u32, FilterType::Triangle);

        let mut xs = Array::from_elem(
            (1, 3, self.height as usize, self.width as usize),
            144.0f32 / 255.0,
        );
        for (x, y, rgb) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            let [r, g, b] = rgb.0;
            xs[[0, 0, y, x]] = r as f32 / 255.0;
            xs[[0, 1, y, x]] = g as f32 / 255.0;
            xs[[0, 2, y, x]] = b as f32 / 255.0;
        }
        (xs, ratio)
    }
}

impl DetectModel for YOLOv8 {
    fn detect(&mut self, frame: &RgbImage, conf_threshold: f32) -> Result<Vec<RawDetection>> {
        let t_pre = Instant::now();
        let (xs, ratio) = self.preprocess(frame);
        let input = Tensor::from_array(xs).context("failed to build input tensor")?;
        log::trace!("[Model Preprocess]: {:?}", t_pre.elapsed());

        let t_run = Instant::now();
        let outputs = self
            .session
            .run(ort::inputs![input])
            .context("YOLOv8 inference failed")?;
        log::trace!("[Model Inference]: {:?}", t_run.elapsed());

        // [1, 4 + nc, N]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed to extract YOLOv8 output tensor")?;
        if shape.len() != 3 || shape[1] <= 4 {
            return Err(anyhow!("unexpected YOLOv8 output shape {:?}", shape));
        }
        let num_classes = shape[1] as usize - 4;
        let num_preds = shape[2] as usize;

        let mut ys = decode_predictions(
            data,
            num_classes,
            num_preds,
            ratio,
            frame.dimensions(),
            conf_threshold,
        );
        non_max_suppression(&mut ys, self.iou);
        Ok(ys)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
