//! 检测历史 (Detection history)
//!
//! 固定容量的 FIFO: 先追加, 超出容量时淘汰最旧的一条

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::detection::Detection;

/// 历史记录容量
pub const HISTORY_CAPACITY: usize = 100;

/// 单帧检测摘要
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub detection_count: usize,
    pub object_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetectionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for DetectionHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl DetectionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// 空检测集不记录
    pub fn record(&mut self, detections: &[Detection], now: DateTime<Local>) {
        if detections.is_empty() {
            return;
        }
        self.entries.push_back(HistoryEntry {
            timestamp: now,
            detection_count: detections.len(),
            object_names: detections
                .iter()
                .map(|d| d.class_name().to_string())
                .collect(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 按时间顺序 (最旧在前)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}
