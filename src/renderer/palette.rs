//! 检测框调色板 (按检测序号循环, 与目标身份无关)

use image::Rgb;

pub const PALETTE: [Rgb<u8>; 9] = [
    Rgb([100, 100, 255]),
    Rgb([100, 255, 100]),
    Rgb([255, 100, 100]),
    Rgb([100, 255, 255]),
    Rgb([255, 100, 255]),
    Rgb([255, 255, 100]),
    Rgb([100, 150, 200]),
    Rgb([100, 200, 150]),
    Rgb([200, 150, 100]),
];

pub fn color_for(index: usize) -> Rgb<u8> {
    PALETTE[index % PALETTE.len()]
}
