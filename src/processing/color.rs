use image::GrayImage;
use tracing::warn;

use crate::error::FrameError;
use crate::types::{IntensityGrid, PixelLayout, SquareCrop};

/// Rec.601 luma weights for R, G, B.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Single-channel luminance filter built for one pixel layout.
struct LumaFilter {
    offsets: [usize; 3],
    channels: usize,
    invert: bool,
}

impl LumaFilter {
    fn for_layout(layout: PixelLayout, invert: bool) -> Option<Self> {
        layout.rgb_offsets().map(|offsets| LumaFilter {
            offsets,
            channels: layout.channels(),
            invert,
        })
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.chunks_exact(self.channels)
            .map(|px| {
                let y = LUMA_WEIGHTS[0] * px[self.offsets[0]] as f32
                    + LUMA_WEIGHTS[1] * px[self.offsets[1]] as f32
                    + LUMA_WEIGHTS[2] * px[self.offsets[2]] as f32;
                let y = y.round().clamp(0.0, 255.0) as u8;
                if self.invert {
                    255 - y
                } else {
                    y
                }
            })
            .collect()
    }
}

/// Convert a crop to one intensity channel, optionally as a negative.
///
/// When no filter exists for the layout the crop passes through unchanged,
/// but only if it is already single-channel; otherwise the output size would
/// change and the frame fails with `FrameError::Filter`.
pub fn to_intensity(crop: &SquareCrop, invert: bool) -> Result<IntensityGrid, FrameError> {
    let side = crop.side as u32;
    let gray = match LumaFilter::for_layout(crop.layout, invert) {
        Some(filter) => filter.apply(&crop.data),
        None if crop.layout.channels() == 1 => {
            warn!(layout = ?crop.layout, "no intensity filter for layout, passing crop through");
            crop.data.clone()
        }
        None => {
            return Err(FrameError::Filter(format!(
                "no luminance transform for {:?}",
                crop.layout
            )))
        }
    };

    GrayImage::from_raw(side, side, gray)
        .map(IntensityGrid)
        .ok_or_else(|| FrameError::Filter(format!("intensity output is not {}x{}", side, side)))
}
