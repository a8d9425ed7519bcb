//! 叠加层合成 (Overlay compositor)
//!
//! 纯函数: (帧, 检测, 会话状态, 时钟) → 标注后的帧, 按固定顺序分层绘制:
//! 1. 顶部标题栏 (半透明)
//! 2. 检测框 + 角标 + 标签
//! 3. 底部统计栏 (show_stats 关闭时跳过)
//! 4. 暂停提示 (最后绘制, 不会被遮挡)

use chrono::NaiveTime;
use image::{Rgb, RgbImage};
use imageproc::rect::Rect;

use super::draw::{blend_band, draw_corners, draw_rect, fill_rect};
use super::palette;
use super::text::TextPainter;
use crate::detection::{BBox, Detection};
use crate::session::SessionState;

// ========== 布局常量 ==========

pub const HEADER_HEIGHT: u32 = 80;
pub const FOOTER_HEIGHT: u32 = 80;
/// 标签背景顶边不得高于此行 (标题栏下方)
pub const LABEL_MIN_TOP: i32 = 90;
/// 叠加色占比 (原图保留 70%)
pub const BAND_ALPHA: f32 = 0.3;
pub const BOX_THICKNESS: u32 = 2;
pub const CORNER_LENGTH: i32 = 20;
pub const CORNER_THICKNESS: u32 = 3;
pub const LABEL_PADDING: u32 = 15;
pub const MAX_FOOTER_NAMES: usize = 4;

pub const DEFAULT_TITLE: &str = "AngelEyes - Object Detection";
pub const PAUSE_BANNER: &str = "PAUSED - Press P to resume";

const TITLE_SIZE: f32 = 26.0;
const STATUS_SIZE: f32 = 17.0;
const LABEL_SIZE: f32 = 24.0;
const CONF_SIZE: f32 = 16.0;
const FOOTER_SIZE: f32 = 19.0;
const FOOTER_LIST_SIZE: f32 = 16.0;
const BANNER_SIZE: f32 = 32.0;

const BAND_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const STATUS_COLOR: Rgb<u8> = Rgb([150, 255, 150]);
const FOOTER_COLOR: Rgb<u8> = Rgb([100, 255, 100]);
const FOOTER_LIST_COLOR: Rgb<u8> = Rgb([100, 255, 255]);
const BANNER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// 单个检测标签的布局
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    pub background: Rect,
    pub label: String,
    pub label_pos: (i32, i32),
    pub confidence: String,
    pub confidence_pos: (i32, i32),
}

pub struct Overlay {
    text: TextPainter,
    title: String,
}

impl Overlay {
    pub fn new(text: TextPainter) -> Self {
        Self {
            text,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn compose(
        &self,
        frame: &RgbImage,
        detections: &[Detection],
        state: &SessionState,
        now: NaiveTime,
    ) -> RgbImage {
        let mut img = frame.clone();

        self.draw_header(&mut img, state);
        self.draw_boxes(&mut img, detections);
        if state.show_stats() {
            self.draw_footer(&mut img, detections, now);
        }
        if state.paused() {
            self.draw_pause_banner(&mut img);
        }

        img
    }

    fn draw_header(&self, img: &mut RgbImage, state: &SessionState) {
        blend_band(img, 0, HEADER_HEIGHT, BAND_COLOR, BAND_ALPHA);

        self.text.draw(img, &self.title, 10, 12, TITLE_SIZE, WHITE);

        let settings = format!(
            "Threshold: {} | FPS: {:.1}",
            state.threshold_label(),
            state.fps()
        );
        self.text.draw(img, &settings, 10, 48, STATUS_SIZE, STATUS_COLOR);
    }

    fn draw_boxes(&self, img: &mut RgbImage, detections: &[Detection]) {
        let (frame_w, frame_h) = img.dimensions();
        for (i, det) in detections.iter().enumerate() {
            let color = palette::color_for(i);
            let b = det.bbox();
            // 完全在画面外的框不绘制, 颜色序号仍按检测顺序
            let Some(visible) = b.clipped(frame_w, frame_h) else {
                log::trace!("检测框在画面外: {:?}", b);
                continue;
            };

            // 主边框 (画面外的边由绘图原语裁掉)
            draw_rect(
                img,
                b.x(),
                b.y(),
                (b.width() as u32).saturating_add(1),
                (b.height() as u32).saturating_add(1),
                color,
                BOX_THICKNESS,
            );

            // 角标装饰
            draw_corners(
                img,
                b.x(),
                b.y(),
                b.width(),
                b.height(),
                CORNER_LENGTH,
                CORNER_THICKNESS,
                color,
            );

            // 标签: 先背景后文字, 锚定在可见部分的左上角
            let layout = self.layout_at(det, &visible);
            let bg = layout.background;
            fill_rect(img, bg.left(), bg.top(), bg.width(), bg.height(), color);
            draw_rect(img, bg.left(), bg.top(), bg.width(), bg.height(), WHITE, 1);
            self.text.draw(
                img,
                &layout.label,
                layout.label_pos.0,
                layout.label_pos.1,
                LABEL_SIZE,
                WHITE,
            );
            self.text.draw(
                img,
                &layout.confidence,
                layout.confidence_pos.0,
                layout.confidence_pos.1,
                CONF_SIZE,
                WHITE,
            );
        }
    }

    /// 标签放在检测框上方, 顶边不低于 `LABEL_MIN_TOP`
    pub fn label_layout(&self, det: &Detection) -> LabelLayout {
        self.layout_at(det, det.bbox())
    }

    fn layout_at(&self, det: &Detection, bbox: &BBox) -> LabelLayout {
        let label = det.class_name().to_uppercase();
        let confidence = format!("{:.1}%", det.confidence() * 100.0);

        let (label_w, label_h) = self.text.measure(&label, LABEL_SIZE);
        let (conf_w, conf_h) = self.text.measure(&confidence, CONF_SIZE);

        let bg_w = label_w.max(conf_w) + LABEL_PADDING;
        let bg_h = label_h + conf_h + LABEL_PADDING;

        let x = bbox.x();
        let top = bbox.y().saturating_sub(bg_h as i32).max(LABEL_MIN_TOP);

        LabelLayout {
            background: Rect::at(x, top).of_size(bg_w, bg_h),
            label,
            label_pos: (x.saturating_add(8), top.saturating_add(5)),
            confidence,
            confidence_pos: (
                x.saturating_add(8),
                top.saturating_add(8 + label_h as i32),
            ),
        }
    }

    fn draw_footer(&self, img: &mut RgbImage, detections: &[Detection], now: NaiveTime) {
        let height = img.height();
        blend_band(
            img,
            height.saturating_sub(FOOTER_HEIGHT),
            height,
            BAND_COLOR,
            BAND_ALPHA,
        );

        let h = height as i32;
        let line = format!(
            "Objects: {} | Time: {}",
            detections.len(),
            now.format("%H:%M:%S")
        );
        self.text.draw(img, &line, 10, h - 66, FOOTER_SIZE, FOOTER_COLOR);

        if let Some(summary) = footer_summary(detections) {
            self.text
                .draw(img, &summary, 10, h - 34, FOOTER_LIST_SIZE, FOOTER_LIST_COLOR);
        }
    }

    fn draw_pause_banner(&self, img: &mut RgbImage) {
        let (w, h) = self.text.measure(PAUSE_BANNER, BANNER_SIZE);
        let x = (img.width() as i32 - w as i32) / 2;
        let y = (img.height() as i32 - h as i32) / 2;
        self.text.draw(img, PAUSE_BANNER, x, y, BANNER_SIZE, BANNER_COLOR);
    }
}

/// 底部栏目标列表: 去重并保持首次出现顺序, 最多列出4个
pub fn footer_summary(detections: &[Detection]) -> Option<String> {
    let mut unique: Vec<&str> = Vec::new();
    for d in detections {
        if !unique.contains(&d.class_name()) {
            unique.push(d.class_name());
        }
    }
    if unique.is_empty() {
        return None;
    }

    let shown: Vec<&str> = unique.iter().take(MAX_FOOTER_NAMES).copied().collect();
    let mut text = format!("Detected: {}", shown.join(", "));
    if unique.len() > MAX_FOOTER_NAMES {
        text.push_str("...");
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{resolve, ClassNames, RawDetection};

    fn overlay() -> Overlay {
        Overlay::new(TextPainter::builtin().unwrap())
    }

    fn det(name: &str, x: i32, y: i32) -> Detection {
        Detection::new(BBox::new(x, y, 120, 100), name, 0.875, 1).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 34, 56).unwrap()
    }

    fn count_color(img: &RgbImage, color: Rgb<u8>, rows: std::ops::Range<u32>) -> usize {
        rows.flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y) == &color)
            .count()
    }

    #[test]
    fn test_footer_dedup_keeps_first_seen_order() {
        let ds = vec![det("cat", 0, 0), det("cat", 10, 10), det("dog", 20, 20)];
        assert_eq!(footer_summary(&ds).unwrap(), "Detected: cat, dog");
        assert_eq!(footer_summary(&[]), None);
    }

    #[test]
    fn test_footer_truncates_after_four() {
        let ds: Vec<_> = ["a", "b", "c", "d", "e", "a"]
            .iter()
            .map(|n| det(n, 0, 0))
            .collect();
        assert_eq!(footer_summary(&ds).unwrap(), "Detected: a, b, c, d...");
        let ds: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| det(n, 0, 0)).collect();
        assert_eq!(footer_summary(&ds).unwrap(), "Detected: a, b, c, d");
    }

    #[test]
    fn test_label_clamped_below_header() {
        let ov = overlay();
        let layout = ov.label_layout(&det("person", 50, 20));
        assert!(layout.background.top() >= HEADER_HEIGHT as i32);
        assert_eq!(layout.background.top(), LABEL_MIN_TOP);
        assert_eq!(layout.label, "PERSON");
        assert_eq!(layout.confidence, "87.5%");

        // 下方的检测框: 标签位于框上方
        let layout = ov.label_layout(&det("person", 50, 400));
        assert_eq!(layout.background.bottom() + 1, 400);
    }

    #[test]
    fn test_label_background_drawn_below_header() {
        let ov = overlay();
        let frame = RgbImage::new(640, 480);
        let d = det("cat", 50, 20);
        let img = ov.compose(&frame, &[d], &SessionState::default(), noon());
        // 背景左侧内部 (避开文字与白色描边)
        assert_eq!(img.get_pixel(52, LABEL_MIN_TOP as u32 + 2), &palette::color_for(0));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let ov = overlay();
        let frame = RgbImage::from_fn(320, 240, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]));
        let ds = vec![det("cat", 30, 100), det("dog", 150, 60)];
        let mut state = SessionState::default();
        state.toggle_pause();
        let a = ov.compose(&frame, &ds, &state, noon());
        let b = ov.compose(&frame, &ds, &state, noon());
        assert_eq!(a.as_raw(), b.as_raw());
        assert_ne!(a.as_raw(), frame.as_raw());
    }

    #[test]
    fn test_header_is_blended_not_overwritten() {
        let ov = overlay();
        let frame = RgbImage::from_pixel(640, 480, Rgb([200, 200, 200]));
        let img = ov.compose(&frame, &[], &SessionState::default(), noon());
        assert_eq!(img.get_pixel(639, 0), &Rgb([140, 140, 140]));
        assert_eq!(img.get_pixel(639, HEADER_HEIGHT - 1), &Rgb([140, 140, 140]));
        assert_eq!(img.get_pixel(639, HEADER_HEIGHT), &Rgb([200, 200, 200]));
        // 底部栏
        assert_eq!(img.get_pixel(639, 479), &Rgb([140, 140, 140]));
    }

    #[test]
    fn test_footer_skipped_when_stats_off() {
        let ov = overlay();
        let frame = RgbImage::from_pixel(640, 480, Rgb([200, 200, 200]));
        let mut state = SessionState::default();
        state.toggle_stats();
        let img = ov.compose(&frame, &[], &state, noon());
        assert_eq!(img.get_pixel(639, 479), &Rgb([200, 200, 200]));
        assert_eq!(img.get_pixel(10, 470), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_pause_banner_drawn_last() {
        let ov = overlay();
        let frame = RgbImage::new(640, 480);
        let mut state = SessionState::default();
        state.toggle_stats();

        let img = ov.compose(&frame, &[], &state, noon());
        assert_eq!(count_color(&img, BANNER_COLOR, 200..280), 0);

        state.toggle_pause();
        // 覆盖画面中央的检测框也不能遮挡提示
        let ds = vec![Detection::new(BBox::new(100, 150, 440, 180), "cat", 0.9, 1).unwrap()];
        let img = ov.compose(&frame, &ds, &state, noon());
        assert!(count_color(&img, BANNER_COLOR, 200..280) > 0);
    }

    #[test]
    fn test_huge_box_is_clipped_to_frame() {
        let ov = overlay();
        let mut state = SessionState::default();
        state.toggle_stats();

        // 完全在画面外: 与无检测时的输出一致
        let frame = RgbImage::new(64, 64);
        let far = Detection::new(BBox::new(100, 100, i32::MAX - 10, 50), "cat", 0.5, 1).unwrap();
        let img = ov.compose(&frame, &[far], &state, noon());
        assert_eq!(img.as_raw(), ov.compose(&frame, &[], &state, noon()).as_raw());

        // 部分可见: 只画画面内的部分
        let frame = RgbImage::new(320, 240);
        let wide = Detection::new(BBox::new(10, 100, i32::MAX - 10, 50), "cat", 0.5, 1).unwrap();
        let img = ov.compose(&frame, &[wide], &state, noon());
        assert_eq!(img.get_pixel(10, 149), &palette::color_for(0));
        assert_eq!(img.get_pixel(200, 100), &palette::color_for(0));
        // 右边在画面外, 画面边缘没有边线
        assert_eq!(img.get_pixel(319, 120), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_unbounded_model_boxes_render() {
        let ov = overlay();
        let names = ClassNames::new(vec!["cat".into()]);
        let raw = vec![
            RawDetection::new(1, 0.5, [f32::INFINITY, 10.0, 20.0, 20.0]),
            RawDetection::new(1, 0.5, [1e12, 10.0, 20.0, 20.0]),
            RawDetection::new(1, 0.5, [-1e9, -1e9, f32::INFINITY, f32::INFINITY]),
        ];
        // 坐标饱和后仍是合法检测
        let ds = resolve(raw, &names);
        assert_eq!(ds.len(), 3);

        let frame = RgbImage::new(64, 64);
        let mut state = SessionState::default();
        state.toggle_stats();
        let img = ov.compose(&frame, &ds, &state, noon());
        // 第三个框覆盖整个画面, 但边线全部落在画面外, 不能在画面边缘画出假边
        assert_eq!(img.dimensions(), (64, 64));
        for y in 0..64 {
            assert_eq!(img.get_pixel(0, y), &Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn test_label_layout_saturates_at_edges() {
        let ov = overlay();
        let d = Detection::new(BBox::new(i32::MAX - 2, i32::MIN, 5, 5), "cat", 0.5, 1).unwrap();
        let layout = ov.label_layout(&d);
        assert_eq!(layout.label_pos.0, i32::MAX);
        assert_eq!(layout.background.top(), LABEL_MIN_TOP);
    }
}
