/// 主循环 (Main loop orchestrator)
///
/// 单线程, 每次迭代完整执行:
/// 采集 → 检测 → 历史 → 合成 → 帧率 → 显示 → 按键
///
/// 暂停时复用最后一帧且不调用检测; 采集失败记录日志并结束循环,
/// 帧源随 Pipeline 一起释放.
pub mod display;

use std::time::Instant;

use chrono::Local;
use image::RgbImage;

use crate::detection::Detector;
use crate::error::Result;
use crate::input::FrameSource;
use crate::renderer::Overlay;
use crate::session::{interpret, Flow, FpsMeter, SessionState};

pub use display::{Display, HeadlessDisplay};

pub struct Pipeline {
    source: Box<dyn FrameSource>,
    detector: Detector,
    overlay: Overlay,
    session: SessionState,
    fps: FpsMeter,
    last_frame: Option<RgbImage>,
    iterations: u64,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Detector,
        overlay: Overlay,
        session: SessionState,
    ) -> Self {
        log::info!(
            "🎬 主循环就绪: 输入={} | 检测={} | 阈值={:.2}",
            source.describe(),
            if detector.is_enabled() { "ON" } else { "OFF" },
            session.threshold()
        );
        Self {
            source,
            detector,
            overlay,
            session,
            fps: FpsMeter::new(Instant::now()),
            last_frame: None,
            iterations: 0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    fn acquire(&mut self) -> Result<RgbImage> {
        match self.source.read() {
            Ok(frame) => {
                self.last_frame = Some(frame.clone());
                Ok(frame)
            }
            Err(e) => {
                log::error!("❌ Failed to read from {}: {}", self.source.describe(), e);
                Err(e)
            }
        }
    }

    /// 执行一次完整迭代
    pub fn tick<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<Flow> {
        // 暂停时复用最后一帧 (尚无帧时仍需采集一次)
        let reused = if self.session.paused() {
            self.last_frame.clone()
        } else {
            None
        };
        let frame = match reused {
            Some(frame) => frame,
            None => self.acquire()?,
        };

        let detections = if self.session.paused() {
            Vec::new()
        } else {
            self.detector.detect(&frame, self.session.threshold())
        };

        let now = Local::now();
        self.session.record_detections(&detections, now);

        let composed = self
            .overlay
            .compose(&frame, &detections, &self.session, now.time());

        let fps = self.fps.record_frame(Instant::now());
        self.session.set_fps(fps);

        display.present(&composed)?;
        self.iterations += 1;

        Ok(interpret(display.poll_key(), &mut self.session))
    }

    /// 运行至退出按键或采集失败
    pub fn run<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<()> {
        let result = loop {
            match self.tick(display) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        log::info!("🛑 主循环结束 (共 {} 次迭代)", self.iterations);
        log::info!("📊 检测统计: {}", self.detector.summary());
        result
    }
}
