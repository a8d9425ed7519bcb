//! macroquad 窗口显示 (Window display)
//!
//! 只负责把合成好的帧贴到屏幕并读取按键, 不做任何绘制逻辑

use image::RgbImage;
use macroquad::prelude::{
    clear_background, draw_texture_ex, get_char_pressed, screen_height, screen_width, vec2,
    Conf, DrawTextureParams, FilterMode, Texture2D, BLACK, WHITE,
};

use crate::error::{AngelError, Result};
use crate::pipeline::Display;

pub fn window_conf(title: &str, width: u32, height: u32) -> Conf {
    Conf {
        window_title: title.to_string(),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[derive(Default)]
pub struct WindowDisplay {
    texture: Option<Texture2D>,
    presented: u64,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

fn to_rgba(frame: &RgbImage) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(frame.as_raw().len() / 3 * 4);
    for px in frame.as_raw().chunks_exact(3) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    rgba
}

impl Display for WindowDisplay {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        let (w, h) = frame.dimensions();
        if w > u16::MAX as u32 || h > u16::MAX as u32 {
            return Err(AngelError::Display(format!("frame too large: {}x{}", w, h)));
        }
        let rgba = to_rgba(frame);

        // 只在分辨率变化时重建纹理, 否则更新像素数据
        let needs_rebuild = match &self.texture {
            Some(tex) => tex.width() != w as f32 || tex.height() != h as f32,
            None => true,
        };
        if needs_rebuild {
            let texture = Texture2D::from_rgba8(w as u16, h as u16, &rgba);
            texture.set_filter(FilterMode::Linear);
            self.texture = Some(texture);
        } else if let Some(tex) = &self.texture {
            tex.update(&macroquad::texture::Image {
                bytes: rgba,
                width: w as u16,
                height: h as u16,
            });
        }

        clear_background(BLACK);
        if let Some(tex) = &self.texture {
            draw_texture_ex(
                tex,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(screen_width(), screen_height())),
                    ..Default::default()
                },
            );
        }
        self.presented += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        get_char_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_conversion() {
        let img = RgbImage::from_pixel(2, 1, image::Rgb([1, 2, 3]));
        assert_eq!(to_rgba(&img), vec![1, 2, 3, 255, 1, 2, 3, 255]);
    }

    #[test]
    fn test_window_conf() {
        let conf = window_conf("AngelEyes", 1280, 720);
        assert_eq!(conf.window_title, "AngelEyes");
        assert_eq!(conf.window_width, 1280);
        assert_eq!(conf.window_height, 720);
    }
}
