//! 显示输出 (Display sink)

use std::collections::VecDeque;
use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// 每次迭代接收一帧合成结果, 并提供至多一个按键
pub trait Display {
    fn present(&mut self, frame: &RgbImage) -> Result<()>;

    /// 非阻塞, 无按键时返回 None
    fn poll_key(&mut self) -> Option<char>;
}

/// 无窗口显示: 保留最后一帧, 按脚本回放按键, 达到帧数上限后发送退出
#[derive(Default)]
pub struct HeadlessDisplay {
    keys: VecDeque<Option<char>>,
    max_frames: Option<u64>,
    presented: u64,
    last: Option<RgbImage>,
}

impl HeadlessDisplay {
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            max_frames,
            ..Default::default()
        }
    }

    /// 第 i 次 poll 返回 keys[i]
    pub fn with_keys<I: IntoIterator<Item = Option<char>>>(mut self, keys: I) -> Self {
        self.keys = keys.into_iter().collect();
        self
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.last.as_ref()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        match &self.last {
            Some(img) => {
                img.save(path.as_ref())?;
                log::info!("💾 最后一帧已保存到 {}", path.as_ref().display());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        self.presented += 1;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        if let Some(key) = self.keys.pop_front() {
            return key;
        }
        match self.max_frames {
            Some(max) if self.presented >= max => Some('q'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_keys_then_frame_limit() {
        let mut display = HeadlessDisplay::new(Some(2)).with_keys([None, Some('s')]);
        let frame = RgbImage::new(2, 2);

        display.present(&frame).unwrap();
        assert_eq!(display.poll_key(), None);
        display.present(&frame).unwrap();
        assert_eq!(display.poll_key(), Some('s'));
        assert_eq!(display.poll_key(), Some('q'));
        assert_eq!(display.presented(), 2);
    }

    #[test]
    fn test_save_last_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.png");
        let mut display = HeadlessDisplay::new(None);
        assert!(!display.save(&path).unwrap());
        display.present(&RgbImage::new(3, 3)).unwrap();
        assert!(display.save(&path).unwrap());
        assert!(path.exists());
    }
}
