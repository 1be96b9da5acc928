use image::{GrayImage, RgbImage};
use ndarray::Array2;

use crate::error::FrameError;

/// Side length of the classifier input grid.
pub const GRID_SIDE: usize = 28;

/// Number of values in the classifier input grid (28 x 28).
pub const GRID_LEN: usize = GRID_SIDE * GRID_SIDE;

/// Number of classes produced by the digit classifier.
pub const NUM_CLASSES: usize = 10;

/// Channel layout of a raw camera frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PixelLayout {
    Gray8,
    Rgb8,
    Rgba8,
    /// Native 32-bit BGRA camera buffers.
    Bgra8,
    /// Opaque layout; only the channel count is known.
    Other { channels: usize },
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Gray8 => 1,
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 | PixelLayout::Bgra8 => 4,
            PixelLayout::Other { channels } => *channels,
        }
    }

    /// Byte offsets of the red, green and blue samples within one pixel.
    pub(crate) fn rgb_offsets(&self) -> Option<[usize; 3]> {
        match self {
            PixelLayout::Gray8 => Some([0, 0, 0]),
            PixelLayout::Rgb8 | PixelLayout::Rgba8 => Some([0, 1, 2]),
            PixelLayout::Bgra8 => Some([2, 1, 0]),
            PixelLayout::Other { .. } => None,
        }
    }
}

/// Byte length of a `width` x `height` frame, or a geometry error on overflow.
fn frame_len(width: usize, height: usize, channels: usize) -> Result<usize, FrameError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            FrameError::Geometry(format!(
                "{}x{} frame with {} channel(s) overflows the address space",
                width, height, channels
            ))
        })
}

/// One frame as delivered by a frame source, interleaved 8-bit samples.
#[derive(Clone, Debug)]
pub struct RawFrame {
    width: usize,
    height: usize,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RawFrame {
    pub fn new(
        width: usize,
        height: usize,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if layout.channels() == 0 {
            return Err(FrameError::Geometry("pixel layout has no channels".to_string()));
        }
        let expected = frame_len(width, height, layout.channels())?;
        if data.len() != expected {
            return Err(FrameError::Geometry(format!(
                "{}x{} frame with {} channel(s) needs {} bytes, got {}",
                width,
                height,
                layout.channels(),
                expected,
                data.len()
            )));
        }
        Ok(RawFrame {
            width,
            height,
            layout,
            data,
        })
    }

    /// Frame filled with a single repeated pixel value.
    pub fn uniform(
        width: usize,
        height: usize,
        layout: PixelLayout,
        pixel: &[u8],
    ) -> Result<Self, FrameError> {
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(frame_len(width, height, pixel.len())?)
            .collect();
        RawFrame::new(width, height, layout, data)
    }

    /// Convert a decoded image into a frame, keeping gray and RGB layouts as-is.
    pub fn from_dynamic_image(img: image::DynamicImage) -> Self {
        let (width, height) = image::GenericImageView::dimensions(&img);
        let (width, height) = (width as usize, height as usize);
        let (layout, data) = match img {
            image::DynamicImage::ImageLuma8(buf) => (PixelLayout::Gray8, buf.into_raw()),
            image::DynamicImage::ImageRgb8(buf) => (PixelLayout::Rgb8, buf.into_raw()),
            image::DynamicImage::ImageRgba8(buf) => (PixelLayout::Rgba8, buf.into_raw()),
            other => (PixelLayout::Rgba8, other.to_rgba8().into_raw()),
        };
        RawFrame {
            width,
            height,
            layout,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Square sub-region of a frame, copied out with the frame's layout.
#[derive(Clone, Debug)]
pub struct SquareCrop {
    pub side: usize,
    pub offset_x: usize,
    pub offset_y: usize,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

/// Single-channel 8-bit grid with the same dimensions as the crop.
#[derive(Clone, Debug)]
pub struct IntensityGrid(pub GrayImage);

impl IntensityGrid {
    pub fn side(&self) -> usize {
        self.0.width() as usize
    }
}

/// Exactly 28 x 28 single-channel 8-bit values, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPixelGrid(Array2<u8>);

impl FixedPixelGrid {
    /// Wrap a row-major buffer; anything but 784 values is a resize failure.
    pub(crate) fn from_vec(values: Vec<u8>) -> Result<Self, FrameError> {
        let len = values.len();
        Array2::from_shape_vec((GRID_SIDE, GRID_SIDE), values)
            .map(FixedPixelGrid)
            .map_err(|_| FrameError::Resize(format!("produced {} values, expected {}", len, GRID_LEN)))
    }

    pub(crate) fn from_fn(f: impl FnMut((usize, usize)) -> u8) -> Self {
        FixedPixelGrid(Array2::from_shape_fn((GRID_SIDE, GRID_SIDE), f))
    }

    pub fn view(&self) -> &Array2<u8> {
        &self.0
    }

    pub fn to_gray_image(&self) -> GrayImage {
        let buf = self.0.iter().copied().collect();
        // Shape is fixed at 28x28 so the buffer always fits.
        GrayImage::from_raw(GRID_SIDE as u32, GRID_SIDE as u32, buf)
            .unwrap_or_else(|| GrayImage::new(GRID_SIDE as u32, GRID_SIDE as u32))
    }
}

/// A fixed grid after the orientation permutation has been applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ReorientedGrid(pub(crate) Array2<u8>);

impl ReorientedGrid {
    pub fn view(&self) -> &Array2<u8> {
        &self.0
    }

    /// Reinterpret as a fixed grid, e.g. to apply the permutation again.
    pub(crate) fn into_fixed(self) -> FixedPixelGrid {
        FixedPixelGrid(self.0)
    }
}

/// 784 normalized float32 values, row-major, one per reoriented pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelTensor(pub(crate) Array2<f32>);

impl ModelTensor {
    pub fn view(&self) -> &Array2<f32> {
        &self.0
    }

    /// Contiguous row-major buffer for the inference engine.
    pub fn as_slice(&self) -> &[f32] {
        // Always constructed in standard row-major layout.
        self.0.as_slice().unwrap_or(&[])
    }

    pub fn from_values(values: Vec<f32>) -> Option<Self> {
        Array2::from_shape_vec((GRID_SIDE, GRID_SIDE), values)
            .ok()
            .map(ModelTensor)
    }
}

/// Class index and raw confidence. Index -1 marks "no prediction".
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ClassScore {
    pub class_index: i32,
    pub confidence: f32,
}

impl ClassScore {
    pub const SENTINEL: ClassScore = ClassScore {
        class_index: -1,
        confidence: 0.0,
    };

    pub fn new(class_index: i32, confidence: f32) -> Self {
        ClassScore {
            class_index,
            confidence,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.class_index < 0
    }
}

/// Display-only bitmaps of the intermediate stages. Any of them may be
/// missing if it could not be rendered.
#[derive(Clone, Debug, Default)]
pub struct StageImages {
    pub crop: Option<RgbImage>,
    pub intensity: Option<GrayImage>,
    pub resized: Option<GrayImage>,
}

/// Ranked top-3 classes plus optional diagnostics for presentation.
#[derive(Clone, Debug)]
pub struct PredictionResult {
    pub top: [ClassScore; 3],
    pub visualization: Option<GrayImage>,
    pub stages: StageImages,
}

impl PredictionResult {
    /// The "no valid prediction" result.
    pub fn empty() -> Self {
        PredictionResult {
            top: [ClassScore::SENTINEL; 3],
            visualization: None,
            stages: StageImages::default(),
        }
    }

    pub fn first(&self) -> ClassScore {
        self.top[0]
    }

    pub fn second(&self) -> ClassScore {
        self.top[1]
    }

    pub fn third(&self) -> ClassScore {
        self.top[2]
    }

    pub fn is_empty(&self) -> bool {
        self.top.iter().all(ClassScore::is_sentinel)
    }
}
