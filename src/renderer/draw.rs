//! 绘图原语 (Drawing primitives on RgbImage)

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// 在 [y0, y1) 行区间内与纯色混合: out = src * (1 - alpha) + color * alpha
pub fn blend_band(img: &mut RgbImage, y0: u32, y1: u32, color: Rgb<u8>, alpha: f32) {
    let y1 = y1.min(img.height());
    let keep = 1.0 - alpha;
    for y in y0..y1 {
        for x in 0..img.width() {
            let px = img.get_pixel_mut(x, y);
            for c in 0..3 {
                let v = px.0[c] as f32 * keep + color.0[c] as f32 * alpha;
                px.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// 把矩形收缩到画面外扩1像素的范围内, 在 i64 下计算避免溢出
///
/// 落在画面外的边本来就不可见, 收缩后 imageproc 内部的 `left + width - 1` 不会越界
fn bounded(img: &RgbImage, x: i64, y: i64, w: i64, h: i64) -> Option<Rect> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let (iw, ih) = (img.width() as i64, img.height() as i64);
    let (x0, y0) = (x.max(-1), y.max(-1));
    let (x1, y1) = ((x + w).min(iw + 1), (y + h).min(ih + 1));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32))
}

/// 空心矩形, 线宽向内扩展
pub fn draw_rect(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness {
        let (tw, th) = (w.saturating_sub(2 * t), h.saturating_sub(2 * t));
        if tw == 0 || th == 0 {
            break;
        }
        let (tx, ty) = (x as i64 + t as i64, y as i64 + t as i64);
        if let Some(rect) = bounded(img, tx, ty, tw as i64, th as i64) {
            draw_hollow_rect_mut(img, rect, color);
        }
    }
}

pub fn fill_rect(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
    fill_rect_wide(img, x as i64, y as i64, w as i64, h as i64, color);
}

fn fill_rect_wide(img: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
    if let Some(rect) = bounded(img, x, y, w, h) {
        draw_filled_rect_mut(img, rect, color);
    }
}

/// 四角L形装饰 (仅视觉强调)
pub fn draw_corners(
    img: &mut RgbImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    arm: i32,
    thickness: u32,
    color: Rgb<u8>,
) {
    let arm_x = arm.min(w).max(1) as i64;
    let arm_y = arm.min(h).max(1) as i64;
    let t = thickness as i64;
    let (x, y) = (x as i64, y as i64);
    let (r, b) = (x + w as i64, y + h as i64);
    // 线宽以边框为中心
    let off = t / 2;

    // 左上
    fill_rect_wide(img, x - off, y - off, arm_x, t, color);
    fill_rect_wide(img, x - off, y - off, t, arm_y, color);
    // 右上
    fill_rect_wide(img, r - arm_x + off + 1, y - off, arm_x, t, color);
    fill_rect_wide(img, r - off, y - off, t, arm_y, color);
    // 左下
    fill_rect_wide(img, x - off, b - off, arm_x, t, color);
    fill_rect_wide(img, x - off, b - arm_y + off + 1, t, arm_y, color);
    // 右下
    fill_rect_wide(img, r - arm_x + off + 1, b - off, arm_x, t, color);
    fill_rect_wide(img, r - off, b - arm_y + off + 1, t, arm_y, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_band_ratio() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([200, 100, 10]));
        blend_band(&mut img, 0, 2, Rgb([0, 0, 0]), 0.3);
        assert_eq!(img.get_pixel(0, 0), &Rgb([140, 70, 7]));
        assert_eq!(img.get_pixel(3, 1), &Rgb([140, 70, 7]));
        assert_eq!(img.get_pixel(0, 2), &Rgb([200, 100, 10]));
    }

    #[test]
    fn test_draw_rect_thickness() {
        let red = Rgb([255, 0, 0]);
        let mut img = RgbImage::new(20, 20);
        draw_rect(&mut img, 2, 2, 10, 10, red, 2);
        assert_eq!(img.get_pixel(2, 2), &red);
        assert_eq!(img.get_pixel(3, 3), &red);
        assert_eq!(img.get_pixel(11, 11), &red);
        assert_eq!(img.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_corners_out_of_bounds_is_clipped() {
        let mut img = RgbImage::new(10, 10);
        draw_corners(&mut img, -5, -5, 30, 30, 20, 3, Rgb([0, 255, 0]));
        draw_corners(&mut img, 2, 2, 5, 5, 20, 3, Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(2, 2), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let blue = Rgb([0, 0, 255]);
        let mut img = RgbImage::new(16, 16);
        draw_rect(&mut img, i32::MAX - 4, 2, u32::MAX, 10, blue, 2);
        draw_rect(&mut img, 4, 4, u32::MAX, u32::MAX, blue, 2);
        fill_rect(&mut img, i32::MIN, i32::MIN, u32::MAX, u32::MAX, blue);
        draw_corners(&mut img, i32::MAX - 5, i32::MAX - 5, i32::MAX, i32::MAX, 20, 3, blue);
        // 巨大的框只留下画面内可见的左/上边
        let mut img = RgbImage::new(16, 16);
        draw_rect(&mut img, 4, 4, u32::MAX, u32::MAX, blue, 1);
        assert_eq!(img.get_pixel(4, 10), &blue);
        assert_eq!(img.get_pixel(10, 4), &blue);
        assert_eq!(img.get_pixel(10, 10), &Rgb([0, 0, 0]));
    }
}
