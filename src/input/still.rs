//! 图片输入 (Image file / directory replayed as a live feed)

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use super::FrameSource;
use crate::error::{AngelError, Result};

pub struct StillSource {
    origin: PathBuf,
    frames: Vec<PathBuf>,
    cursor: usize,
    // 单张图片只解码一次
    cached: Option<RgbImage>,
}

impl StillSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let origin = path.as_ref().to_path_buf();
        let frames = if origin.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&origin)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
                .collect();
            files.sort();
            files
        } else if origin.is_file() {
            vec![origin.clone()]
        } else {
            return Err(AngelError::acquisition(format!(
                "image source not found: {}",
                origin.display()
            )));
        };

        if frames.is_empty() {
            return Err(AngelError::acquisition(format!(
                "no images in {}",
                origin.display()
            )));
        }
        log::info!("🖼️ 图片输入: {} ({} 张)", origin.display(), frames.len());

        Ok(Self {
            origin,
            frames,
            cursor: 0,
            cached: None,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn decode(path: &Path) -> Result<RgbImage> {
        image::open(path)
            .map(|img| img.to_rgb8())
            .map_err(|e| AngelError::acquisition(format!("{}: {}", path.display(), e)))
    }
}

impl FrameSource for StillSource {
    fn read(&mut self) -> Result<RgbImage> {
        if self.frames.len() == 1 {
            if let Some(img) = &self.cached {
                return Ok(img.clone());
            }
            let img = Self::decode(&self.frames[0])?;
            self.cached = Some(img.clone());
            return Ok(img);
        }

        let path = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();
        Self::decode(path)
    }

    fn describe(&self) -> String {
        format!("images:{}", self.origin.display())
    }
}
