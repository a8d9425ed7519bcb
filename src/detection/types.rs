//! 检测系统数据结构定义
//! Data structures for the detection overlay

// ========== 数据结构 ==========

/// 检测模型原始输出 (Raw model output, not yet validated)
///
/// `class_id` 从1开始计数, 对应类别表的 `class_id - 1`
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    pub class_id: i32,
    pub confidence: f32,
    pub bbox: [f32; 4], // (x, y, width, height) 像素坐标
}

impl RawDetection {
    pub fn new(class_id: i32, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }
}

/// 检测框 (Detection bounding box, pixel space)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl BBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 四舍五入到像素网格
    ///
    /// 超出 i32 的坐标 (含无穷) 由 `as` 饱和, NaN 变为 0
    pub fn from_xywh(xywh: [f32; 4]) -> Self {
        let [x, y, w, h] = xywh;
        Self::new(
            x.round() as i32,
            y.round() as i32,
            w.round() as i32,
            h.round() as i32,
        )
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// 与 `frame_w x frame_h` 画面求交, 完全落在画面外时返回 None
    pub fn clipped(&self, frame_w: u32, frame_h: u32) -> Option<BBox> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(frame_w as i64);
        let y1 = (self.y as i64 + self.height as i64).min(frame_h as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(BBox::new(
            x0 as i32,
            y0 as i32,
            (x1 - x0) as i32,
            (y1 - y0) as i32,
        ))
    }
}

/// 非法检测 (Rejected detection)
#[derive(Clone, Debug, PartialEq)]
pub enum InvalidDetection {
    EmptySize { width: i32, height: i32 },
    Confidence(f32),
    EmptyClassName,
}

impl std::fmt::Display for InvalidDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySize { width, height } => {
                write!(f, "non-positive box size {}x{}", width, height)
            }
            Self::Confidence(c) => write!(f, "confidence {} outside [0, 1]", c),
            Self::EmptyClassName => write!(f, "empty class name"),
        }
    }
}

impl std::error::Error for InvalidDetection {}

/// 已校验的检测结果 (一帧内有效, 创建后不可修改)
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    bbox: BBox,
    class_name: String,
    confidence: f32,
    class_id: i32,
}

impl Detection {
    pub fn new(
        bbox: BBox,
        class_name: impl Into<String>,
        confidence: f32,
        class_id: i32,
    ) -> Result<Self, InvalidDetection> {
        if bbox.width <= 0 || bbox.height <= 0 {
            return Err(InvalidDetection::EmptySize {
                width: bbox.width,
                height: bbox.height,
            });
        }
        // NaN 也会落在这里
        if !(0.0..=1.0).contains(&confidence) {
            return Err(InvalidDetection::Confidence(confidence));
        }
        let class_name = class_name.into();
        if class_name.is_empty() {
            return Err(InvalidDetection::EmptyClassName);
        }
        Ok(Self {
            bbox,
            class_name,
            confidence,
            class_id,
        })
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn class_id(&self) -> i32 {
        self.class_id
    }
}
