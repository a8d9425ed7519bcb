/// 渲染系统 (Renderer)
///
/// - overlay: 叠加层合成 (纯函数, CPU绘制到 RgbImage)
/// - draw/text/palette: 绘图原语, 字体, 调色板
/// - window: macroquad 窗口显示
pub mod draw;
pub mod overlay;
pub mod palette;
pub mod text;
pub mod window;

pub use overlay::{footer_summary, LabelLayout, Overlay};
pub use text::TextPainter;
pub use window::{window_conf, WindowDisplay};
