//! 会话状态 (Session state)
//!
//! 阈值内部以百分比整数保存, 步进严格为 0.05

use chrono::{DateTime, Local};

use super::history::DetectionHistory;
use crate::detection::Detection;

/// 阈值下限 / 上限 / 步长 (百分比)
pub const THRESHOLD_MIN_PCT: u32 = 10;
pub const THRESHOLD_MAX_PCT: u32 = 100;
pub const THRESHOLD_STEP_PCT: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    threshold_pct: u32,
    paused: bool,
    show_stats: bool,
    fps: f64,
    history: DetectionHistory,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(0.5, true)
    }
}

impl SessionState {
    /// 初始阈值吸附到 0.05 网格并限制在 [0.1, 1.0]
    pub fn new(threshold: f32, show_stats: bool) -> Self {
        let pct = if threshold.is_finite() {
            let snapped = (threshold * 100.0 / THRESHOLD_STEP_PCT as f32).round() as i64
                * THRESHOLD_STEP_PCT as i64;
            snapped.clamp(THRESHOLD_MIN_PCT as i64, THRESHOLD_MAX_PCT as i64) as u32
        } else {
            50
        };
        Self {
            threshold_pct: pct,
            paused: false,
            show_stats,
            fps: 0.0,
            history: DetectionHistory::default(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold_pct as f32 / 100.0
    }

    pub fn threshold_percent(&self) -> u32 {
        self.threshold_pct
    }

    /// 标题栏显示用 "X.X", 由整数百分比计算, 0.05 的倍数一律向上取整
    pub fn threshold_label(&self) -> String {
        let tenths = (self.threshold_pct + 5) / 10;
        format!("{}.{}", tenths / 10, tenths % 10)
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn show_stats(&self) -> bool {
        self.show_stats
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn history(&self) -> &DetectionHistory {
        &self.history
    }

    pub fn increase_threshold(&mut self) {
        self.threshold_pct = (self.threshold_pct + THRESHOLD_STEP_PCT).min(THRESHOLD_MAX_PCT);
    }

    pub fn decrease_threshold(&mut self) {
        self.threshold_pct = self
            .threshold_pct
            .saturating_sub(THRESHOLD_STEP_PCT)
            .max(THRESHOLD_MIN_PCT);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn record_detections(&mut self, detections: &[Detection], now: DateTime<Local>) {
        self.history.record(detections, now);
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps.max(0.0);
    }
}
