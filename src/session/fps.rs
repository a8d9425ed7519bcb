//! 帧率统计 (Frame-rate estimator)
//!
//! 每累计 30 帧按窗口时长更新一次, 窗口之间返回上一次的值

use std::time::Instant;

/// 统计窗口帧数
pub const FPS_WINDOW: u32 = 30;

#[derive(Clone, Debug)]
pub struct FpsMeter {
    frame_count: u32,
    window_start: Instant,
    current_fps: f64,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl FpsMeter {
    pub fn new(start: Instant) -> Self {
        Self {
            frame_count: 0,
            window_start: start,
            current_fps: 0.0,
        }
    }

    pub fn record_frame(&mut self, now: Instant) -> f64 {
        self.frame_count += 1;
        if self.frame_count >= FPS_WINDOW {
            let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
            if elapsed > 0.0 {
                self.current_fps = self.frame_count as f64 / elapsed;
            }
            self.frame_count = 0;
            self.window_start = now;
        }
        self.current_fps
    }

    pub fn current_fps(&self) -> f64 {
        self.current_fps
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_full_window_publishes_rate() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(t0);
        let mut fps = 0.0;
        for i in 1..=FPS_WINDOW {
            // 30 帧跨越 2 秒
            let now = t0 + Duration::from_millis(2000 * i as u64 / FPS_WINDOW as u64);
            fps = meter.record_frame(now);
        }
        assert!((fps - 15.0).abs() < 1e-9);
        assert_eq!(meter.frame_count(), 0);
    }

    #[test]
    fn test_partial_window_keeps_previous() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(t0);
        for i in 1..FPS_WINDOW {
            assert_eq!(meter.record_frame(t0 + Duration::from_millis(i as u64)), 0.0);
        }
        let t1 = t0 + Duration::from_secs(1);
        assert!((meter.record_frame(t1) - 30.0).abs() < 1e-9);

        // 下一个窗口未满时保持 30.0
        for i in 1..FPS_WINDOW {
            let fps = meter.record_frame(t1 + Duration::from_millis(i as u64 * 100));
            assert!((fps - 30.0).abs() < 1e-9);
        }
        assert_eq!(meter.frame_count(), FPS_WINDOW - 1);
    }
}
