//! 字体与文字测量 (Font + text metrics)

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use once_cell::sync::Lazy;

use crate::error::{AngelError, Result};

/// 内置字体 (DejaVu Sans)
static BUILTIN_FONT_DATA: &[u8] = include_bytes!("../../assets/font/DejaVuSans.ttf");

/// 首次使用时解析
static BUILTIN_FONT: Lazy<Option<FontArc>> =
    Lazy::new(|| FontArc::try_from_slice(BUILTIN_FONT_DATA).ok());

#[derive(Clone)]
pub struct TextPainter {
    font: FontArc,
}

impl TextPainter {
    pub fn builtin() -> Result<Self> {
        let font = BUILTIN_FONT
            .clone()
            .ok_or_else(|| AngelError::Font("builtin font is invalid".to_string()))?;
        Ok(Self { font })
    }

    /// 从文件加载字体, 失败时退回内置字体
    pub fn load_or_builtin<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let path = path.as_ref();
        match std::fs::read(path)
            .map_err(AngelError::from)
            .and_then(|bytes| FontArc::try_from_vec(bytes).map_err(|e| AngelError::Font(e.to_string())))
        {
            Ok(font) => {
                log::info!("✅ 字体加载成功: {}", path.display());
                Ok(Self { font })
            }
            Err(e) => {
                log::warn!("⚠️ 字体加载失败 {}: {}, 使用内置字体", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// 文字渲染尺寸 (宽, 高)
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        text_size(PxScale::from(size), &self.font, text)
    }

    /// (x, y) 为文字左上角
    pub fn draw(&self, img: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        draw_text_mut(img, color, x, y, PxScale::from(size), &self.font, text);
    }
}
