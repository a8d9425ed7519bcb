/// FFmpeg解码过滤器: 摄像头 YUV420P → RgbImage
/// FFmpeg decode filter module
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use ez_ffmpeg::filter::frame_filter::FrameFilter;
use ez_ffmpeg::filter::frame_filter_context::FrameFilterContext;
use ez_ffmpeg::{AVMediaType, Frame};
use image::RgbImage;

#[derive(Clone)]
pub struct DecodeFilter {
    tx: Sender<RgbImage>,
    stop: Arc<AtomicBool>,
    pub dropped_frames: usize, // 丢弃的帧数
    pub total_frames: usize,   // 总帧数
}

impl DecodeFilter {
    pub fn new(tx: Sender<RgbImage>, stop: Arc<AtomicBool>) -> Self {
        Self {
            tx,
            stop,
            dropped_frames: 0,
            total_frames: 0,
        }
    }

    fn drop_frame(&mut self, reason: &str) {
        self.dropped_frames += 1;
        if self.total_frames <= 10 {
            log::warn!("⚠️ 丢弃帧 #{}: {}", self.total_frames, reason);
        }
    }
}

impl FrameFilter for DecodeFilter {
    fn media_type(&self) -> AVMediaType {
        AVMediaType::AVMEDIA_TYPE_VIDEO
    }

    fn init(&mut self, _ctx: &FrameFilterContext) -> Result<(), String> {
        log::info!("✅ 解码线程启动");
        Ok(())
    }

    fn filter_frame(
        &mut self,
        frame: Frame,
        _ctx: &FrameFilterContext,
    ) -> Result<Option<Frame>, String> {
        // 采集端已释放, 停止解码
        if self.stop.load(Ordering::Relaxed) {
            return Err("camera source released".to_string());
        }

        self.total_frames += 1;

        let image = unsafe {
            // 基本检查：空帧或损坏帧
            if frame.as_ptr().is_null() || frame.is_empty() || frame.is_corrupt() {
                self.drop_frame("空帧/损坏帧");
                return Ok(None);
            }

            let raw = &*frame.as_ptr();
            let w = raw.width as usize;
            let h = raw.height as usize;
            if w == 0 || h == 0 || w > 4096 || h > 4096 {
                self.drop_frame("非法分辨率");
                return Ok(None);
            }

            let y_stride = raw.linesize[0] as usize;
            let uv_stride = raw.linesize[1] as usize;
            if raw.data[0].is_null() || raw.data[1].is_null() || raw.data[2].is_null() {
                self.drop_frame("YUV指针为空");
                return Ok(None);
            }
            if y_stride < w || uv_stride < w.div_ceil(2) {
                self.drop_frame("步长异常");
                return Ok(None);
            }

            let uv_rows = h.div_ceil(2);
            let y_plane = std::slice::from_raw_parts(raw.data[0], y_stride * h);
            let u_plane = std::slice::from_raw_parts(raw.data[1], uv_stride * uv_rows);
            let v_plane = std::slice::from_raw_parts(raw.data[2], uv_stride * uv_rows);
            yuv420p_to_rgb(y_plane, u_plane, v_plane, y_stride, uv_stride, w, h)
        };

        match self.tx.try_send(image) {
            Ok(()) => {}
            // 主循环来不及消费时丢弃最新帧
            Err(TrySendError::Full(_)) => self.dropped_frames += 1,
            Err(TrySendError::Disconnected(_)) => {
                return Err("frame receiver disconnected".to_string());
            }
        }

        Ok(Some(frame))
    }

    fn uninit(&mut self, _ctx: &FrameFilterContext) {
        log::info!(
            "✅ 解码线程退出 (总帧{} | 丢弃{})",
            self.total_frames,
            self.dropped_frames
        );
    }
}

/// BT.601 整数近似 (系数乘以128)
pub fn yuv420p_to_rgb(
    y_plane: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    y_stride: usize,
    uv_stride: usize,
    width: usize,
    height: usize,
) -> RgbImage {
    let mut buffer = vec![0u8; width * height * 3];
    let mut out_idx = 0;
    for y in 0..height {
        let y_row = y * y_stride;
        let uv_row = (y >> 1) * uv_stride;

        for x in 0..width {
            let y_val = y_plane[y_row + x] as i32;
            let u_val = u_plane[uv_row + (x >> 1)] as i32 - 128;
            let v_val = v_plane[uv_row + (x >> 1)] as i32 - 128;

            buffer[out_idx] = (y_val + ((v_val * 179) >> 7)).clamp(0, 255) as u8;
            buffer[out_idx + 1] =
                (y_val - ((u_val * 44) >> 7) - ((v_val * 91) >> 7)).clamp(0, 255) as u8;
            buffer[out_idx + 2] = (y_val + ((u_val * 227) >> 7)).clamp(0, 255) as u8;
            out_idx += 3;
        }
    }
    // 尺寸与缓冲区长度一致, from_raw 不会失败
    RgbImage::from_raw(width as u32, height as u32, buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_yuv_is_gray_rgb() {
        let y = vec![100u8; 4 * 2];
        let uv = vec![128u8; 2];
        let img = yuv420p_to_rgb(&y, &uv, &uv, 4, 2, 4, 2);
        assert_eq!(img.dimensions(), (4, 2));
        assert!(img.pixels().all(|p| p.0 == [100, 100, 100]));
    }

    #[test]
    fn test_red_chroma() {
        let y = vec![76u8; 4];
        let u = vec![85u8; 1];
        let v = vec![255u8; 1];
        let img = yuv420p_to_rgb(&y, &u, &v, 2, 1, 2, 2);
        let p = img.get_pixel(1, 1);
        assert!(p[0] > 240 && p[1] < 20 && p[2] < 20);
    }
}
