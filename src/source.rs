use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::RawFrame;

/// Producer of raw frames. `None` means the source is exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Result<RawFrame>>;
}

/// Decodes one image file per frame, in order.
pub struct ImageFileSource {
    paths: VecDeque<PathBuf>,
}

impl ImageFileSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ImageFileSource {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Option<Result<RawFrame>> {
        let path = self.paths.pop_front()?;
        let frame = image::open(&path)
            .with_context(|| format!("Failed to decode frame {}", path.display()))
            .map(RawFrame::from_dynamic_image);
        Some(frame)
    }
}

/// Replays frames already in memory.
pub struct VecSource {
    frames: VecDeque<RawFrame>,
}

impl VecSource {
    pub fn new(frames: Vec<RawFrame>) -> Self {
        VecSource {
            frames: frames.into(),
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Option<Result<RawFrame>> {
        self.frames.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelLayout;
    use image::{GrayImage, Luma};

    #[test]
    fn test_vec_source_in_order() {
        let a = RawFrame::uniform(10, 10, PixelLayout::Gray8, &[1]).unwrap();
        let b = RawFrame::uniform(20, 10, PixelLayout::Gray8, &[2]).unwrap();
        let mut src = VecSource::new(vec![a, b]);
        assert_eq!(src.next_frame().unwrap().unwrap().width(), 10);
        assert_eq!(src.next_frame().unwrap().unwrap().width(), 20);
        assert!(src.next_frame().is_none());
    }

    #[test]
    fn test_image_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("frame.png");
        GrayImage::from_pixel(15, 12, Luma([40])).save(&good).unwrap();
        let missing = dir.path().join("missing.png");

        let mut src = ImageFileSource::new([good, missing]);
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (15, 12));
        assert_eq!(frame.layout(), PixelLayout::Gray8);
        assert!(src.next_frame().unwrap().is_err());
        assert!(src.next_frame().is_none());
    }
}
