use tracing::debug;

use crate::error::FrameError;
use crate::types::{RawFrame, SquareCrop};

/// Crop side is a fixed fraction of the frame width.
const SIDE_DIVISOR: usize = 5;

/// Placement of the centered square inside a frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CropRect {
    pub side: usize,
    pub offset_x: usize,
    pub offset_y: usize,
}

/// Compute the centered square: side = width / 5, centered on both axes.
pub fn crop_rect(width: usize, height: usize) -> Result<CropRect, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::Geometry(format!(
            "frame is {}x{}",
            width, height
        )));
    }
    let side = width / SIDE_DIVISOR;
    if side == 0 {
        return Err(FrameError::Geometry(format!(
            "frame width {} gives an empty crop",
            width
        )));
    }
    if side > height {
        return Err(FrameError::Geometry(format!(
            "crop side {} exceeds frame height {}",
            side, height
        )));
    }
    Ok(CropRect {
        side,
        offset_x: (width - side) / 2,
        offset_y: (height - side) / 2,
    })
}

/// Copy the centered square out of the frame, keeping its channel layout.
pub fn crop(frame: &RawFrame) -> Result<SquareCrop, FrameError> {
    let rect = crop_rect(frame.width(), frame.height())?;
    let channels = frame.layout().channels();
    let src_stride = frame.width() * channels;
    let row_bytes = rect.side * channels;

    let mut data = Vec::with_capacity(rect.side * row_bytes);
    for y in rect.offset_y..rect.offset_y + rect.side {
        let start = y * src_stride + rect.offset_x * channels;
        data.extend_from_slice(&frame.data()[start..start + row_bytes]);
    }

    debug!(
        side = rect.side,
        offset_x = rect.offset_x,
        offset_y = rect.offset_y,
        "cropped frame"
    );

    Ok(SquareCrop {
        side: rect.side,
        offset_x: rect.offset_x,
        offset_y: rect.offset_y,
        layout: frame.layout(),
        data,
    })
}
