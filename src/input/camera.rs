//! 摄像头输入模块
//!
//! 解码线程通过有界通道 (容量2) 把帧交给主循环, 支持 DirectShow(Windows) / AVFoundation(macOS) / V4L2(Linux)

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use ez_ffmpeg::core::context::null_output::create_null_output;
use ez_ffmpeg::filter::frame_pipeline_builder::FramePipelineBuilder;
use ez_ffmpeg::{AVMediaType, FfmpegContext, Input};
use image::RgbImage;

use super::decode_filter::DecodeFilter;
use super::FrameSource;
use crate::error::{AngelError, Result};

/// 解码线程 → 主循环 的帧缓冲
pub const CAMERA_QUEUE: usize = 2;
/// 释放时等待解码线程退出的上限 (设备无输出时线程可能停在 FFmpeg 读帧里)
pub const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

#[cfg(target_os = "windows")]
const CAMERA_FORMAT: &str = "dshow";
#[cfg(target_os = "macos")]
const CAMERA_FORMAT: &str = "avfoundation";
#[cfg(target_os = "linux")]
const CAMERA_FORMAT: &str = "v4l2";
#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
const CAMERA_FORMAT: &str = "video4linux2";

pub struct CameraSource {
    device: String,
    rx: Receiver<RgbImage>,
    stop: Arc<AtomicBool>,
    timeout: Duration,
    worker: Option<JoinHandle<()>>,
}

impl CameraSource {
    pub fn open(index: usize, width: u32, height: u32, timeout: Duration) -> Result<Self> {
        let device = camera_url(index)?;
        log::info!("🎥 打开摄像头: {} ({}x{})", device, width, height);

        let (tx, rx) = bounded::<RgbImage>(CAMERA_QUEUE);
        let stop = Arc::new(AtomicBool::new(false));

        let url = device.clone();
        let filter = DecodeFilter::new(tx, stop.clone());
        let worker = std::thread::Builder::new()
            .name("camera-decode".into())
            .spawn(move || decode_camera(&url, width, height, filter))?;

        Ok(Self {
            device,
            rx,
            stop,
            timeout,
            worker: Some(worker),
        })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Result<RgbImage> {
        match self.rx.recv_timeout(self.timeout) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => Err(AngelError::acquisition(format!(
                "no frame from {} within {}ms",
                self.device,
                self.timeout.as_millis()
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(AngelError::acquisition(format!(
                "camera decoder for {} stopped",
                self.device
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("camera:{}", self.device)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        // 解码线程在下一帧检查到标志后退出
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            join_worker(worker, WORKER_JOIN_TIMEOUT);
        }
        log::info!("📹 摄像头已释放: {}", self.device);
    }
}

/// 限时等待线程结束, 超时则分离线程并返回 false
fn join_worker(worker: JoinHandle<()>, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while !worker.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("⚠️ 解码线程 {}ms 内未退出, 已分离", limit.as_millis());
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    if worker.join().is_err() {
        log::error!("❌ 解码线程异常退出 (panic)");
    }
    true
}

/// 格式化摄像头URL - 根据平台选择
fn camera_url(index: usize) -> Result<String> {
    #[cfg(target_os = "windows")]
    {
        let devices = ez_ffmpeg::device::get_input_video_devices()
            .map_err(|e| AngelError::acquisition(format!("list cameras: {}", e)))?;
        devices
            .into_iter()
            .nth(index)
            .map(|name| format!("video={}", name))
            .ok_or_else(|| AngelError::acquisition(format!("camera {} not found", index)))
    }
    #[cfg(target_os = "linux")]
    {
        Ok(format!("/dev/video{}", index))
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        Ok(format!("{}", index))
    }
}

/// 解码线程: 构建失败或流结束时丢弃发送端, 主循环随即收到断开
fn decode_camera(url: &str, width: u32, height: u32, filter: DecodeFilter) {
    let pipe: FramePipelineBuilder = AVMediaType::AVMEDIA_TYPE_VIDEO.into();
    let pipe = pipe.filter("decode", Box::new(filter));
    let out = create_null_output().add_frame_pipeline(pipe);

    let opts: HashMap<String, String> = [
        ("framerate".to_string(), "30".to_string()),
        ("video_size".to_string(), format!("{}x{}", width, height)),
    ]
    .into();
    let input = Input::new(url)
        .set_format(CAMERA_FORMAT)
        .set_input_opts(opts);

    let ctx = match FfmpegContext::builder()
        .input(input)
        .filter_desc(format!("scale={}:{},format=yuv420p", width, height))
        .output(out)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("❌ 摄像头构建失败: {}", e);
            return;
        }
    };

    let sch = match ctx.start() {
        Ok(s) => s,
        Err(e) => {
            log::error!("❌ 摄像头启动失败: {}", e);
            return;
        }
    };

    log::info!("✅ 摄像头连接成功,开始解码!");
    match sch.wait() {
        Ok(()) => log::info!("📹 摄像头解码循环结束"),
        Err(e) => log::error!("❌ 摄像头解码中断: {}", e),
    }
}

/// 可用摄像头列表
pub fn camera_devices() -> Vec<(usize, String)> {
    match ez_ffmpeg::device::get_input_video_devices() {
        Ok(devices) => devices.into_iter().enumerate().collect(),
        Err(e) => {
            log::warn!("⚠️ 获取摄像头列表失败: {}", e);
            vec![]
        }
    }
}

// 测试只覆盖不依赖设备的部分
#[cfg(test)]
mod tests {
    use super::*;

    fn source(rx: Receiver<RgbImage>, worker: JoinHandle<()>) -> CameraSource {
        CameraSource {
            device: "test".into(),
            rx,
            stop: Arc::new(AtomicBool::new(false)),
            timeout: Duration::from_millis(10),
            worker: Some(worker),
        }
    }

    #[test]
    fn test_disconnected_decoder_is_acquisition_error() {
        let (tx, rx) = bounded::<RgbImage>(CAMERA_QUEUE);
        drop(tx);
        let mut src = source(rx, std::thread::spawn(|| {}));
        assert!(matches!(src.read(), Err(AngelError::Acquisition(_))));
    }

    #[test]
    fn test_timeout_is_acquisition_error() {
        let (_tx, rx) = bounded::<RgbImage>(CAMERA_QUEUE);
        let mut src = source(rx, std::thread::spawn(|| {}));
        assert!(matches!(src.read(), Err(AngelError::Acquisition(_))));
    }

    #[test]
    fn test_drop_joins_worker() {
        let (_tx, rx) = bounded::<RgbImage>(CAMERA_QUEUE);
        let stop = Arc::new(AtomicBool::new(false));
        let exited = Arc::new(AtomicBool::new(false));
        let worker = {
            let (stop, exited) = (stop.clone(), exited.clone());
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    std::thread::sleep(Duration::from_millis(1));
                }
                exited.store(true, Ordering::Relaxed);
            })
        };
        let mut src = source(rx, worker);
        src.stop = stop;
        drop(src);
        // 释放返回时线程已经结束
        assert!(exited.load(Ordering::Relaxed));
    }

    #[test]
    fn test_join_worker_is_bounded() {
        let stuck = std::thread::spawn(|| std::thread::sleep(Duration::from_millis(500)));
        let t0 = Instant::now();
        assert!(!join_worker(stuck, Duration::from_millis(30)));
        assert!(t0.elapsed() < Duration::from_millis(400));

        assert!(join_worker(std::thread::spawn(|| {}), Duration::from_secs(1)));
    }
}
