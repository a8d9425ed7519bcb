/// 视频输入系统 (Video Input System)
///
/// 拉取式帧源, 主循环每次迭代调用一次 `read()`
/// - StillSource:  图片文件/目录, 循环回放
/// - CameraSource: 本地摄像头 (feature `camera`, FFmpeg 解码线程)
#[cfg(feature = "camera")]
pub mod camera;
#[cfg(feature = "camera")]
pub mod decode_filter;
pub mod still;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use image::RgbImage;

use crate::error::{AngelError, Result};

#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use still::StillSource;

/// 帧源: 成功返回一帧, 失败即视为采集终止
pub trait FrameSource {
    fn read(&mut self) -> Result<RgbImage>;

    fn describe(&self) -> String;
}

/// 输入源描述: `camera:N` / 纯数字 → 摄像头, 其余视为路径
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    Camera(usize),
    Images(PathBuf),
}

impl FromStr for InputSource {
    type Err = AngelError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AngelError::acquisition("empty input source"));
        }
        let index = s.strip_prefix("camera:").unwrap_or(s);
        if let Ok(index) = index.parse::<usize>() {
            return Ok(Self::Camera(index));
        }
        if s.starts_with("camera:") {
            return Err(AngelError::acquisition(format!("invalid camera index: {}", s)));
        }
        Ok(Self::Images(PathBuf::from(s)))
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera(i) => write!(f, "camera:{}", i),
            Self::Images(p) => write!(f, "{}", p.display()),
        }
    }
}

/// 打开输入源, 失败即 Fatal-Acquisition
pub fn open(
    source: &InputSource,
    width: u32,
    height: u32,
    timeout: Duration,
) -> Result<Box<dyn FrameSource>> {
    match source {
        #[cfg(feature = "camera")]
        InputSource::Camera(index) => Ok(Box::new(CameraSource::open(
            *index, width, height, timeout,
        )?)),
        #[cfg(not(feature = "camera"))]
        InputSource::Camera(index) => {
            let _ = (width, height, timeout);
            Err(AngelError::acquisition(format!(
                "camera:{} unavailable (built without the `camera` feature)",
                index
            )))
        }
        InputSource::Images(path) => Ok(Box::new(StillSource::open(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_source() {
        assert_eq!("camera:0".parse::<InputSource>().unwrap(), InputSource::Camera(0));
        assert_eq!("2".parse::<InputSource>().unwrap(), InputSource::Camera(2));
        assert_eq!(
            "frames/".parse::<InputSource>().unwrap(),
            InputSource::Images(PathBuf::from("frames/"))
        );
        assert!("camera:x".parse::<InputSource>().is_err());
        assert!("".parse::<InputSource>().is_err());
        assert_eq!(InputSource::Camera(1).to_string(), "camera:1");
    }

    #[cfg(not(feature = "camera"))]
    #[test]
    fn test_camera_without_feature_is_fatal() {
        let err = open(&InputSource::Camera(0), 1280, 720, Duration::from_millis(10))
            .err()
            .unwrap();
        assert!(err.is_fatal());
    }
}
