//! Display-only renderings: coarse reconstruction bitmap, ASCII dump and
//! stage bitmaps. Nothing here feeds the classifier.

use image::{GrayImage, RgbImage};

use crate::error::FrameError;
use crate::types::{ModelTensor, SquareCrop, GRID_SIDE};

/// Coarse bucketing of a normalized value into a signed display level.
///
/// Thresholds are checked top-down and the first match wins.
pub fn to_visualization_level(v: f32) -> i8 {
    if v > 3.0 {
        -127
    } else if v > 2.0 {
        -75
    } else if v > 1.0 {
        -25
    } else if v > 0.0 {
        0
    } else if v > -1.0 {
        25
    } else if v > -2.0 {
        75
    } else {
        127
    }
}

/// The display level stored as its unsigned byte representation.
pub fn to_visualization_byte(v: f32) -> u8 {
    to_visualization_level(v) as u8
}

/// 28x28 gray bitmap of the quantized tensor.
pub fn reconstruction_image(tensor: &ModelTensor) -> Result<GrayImage, FrameError> {
    let bytes: Vec<u8> = tensor.view().iter().map(|&v| to_visualization_byte(v)).collect();
    GrayImage::from_raw(GRID_SIDE as u32, GRID_SIDE as u32, bytes).ok_or_else(|| FrameError::Render {
        stage: "reconstruction",
        reason: "tensor is not 28x28".to_string(),
    })
}

/// `*` for positive values, `.` otherwise; space separated, one line per row.
pub fn to_ascii(tensor: &ModelTensor) -> String {
    tensor
        .view()
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v > 0.0 { "*" } else { "." })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the color crop as RGB for display.
///
/// Opaque layouts have no known channel meaning and cannot be displayed,
/// even when the intensity stage passed them through.
pub fn render_crop(crop: &SquareCrop) -> Result<RgbImage, FrameError> {
    let offsets = crop.layout.rgb_offsets().ok_or_else(|| FrameError::Render {
        stage: "crop",
        reason: format!("cannot display {:?}", crop.layout),
    })?;
    let channels = crop.layout.channels();
    let rgb: Vec<u8> = crop
        .data
        .chunks_exact(channels)
        .flat_map(|px| [px[offsets[0]], px[offsets[1]], px[offsets[2]]])
        .collect();

    let side = crop.side as u32;
    RgbImage::from_raw(side, side, rgb).ok_or_else(|| FrameError::Render {
        stage: "crop",
        reason: format!("crop buffer does not cover {}x{}", side, side),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::normalize::normalize_value;
    use crate::types::PixelLayout;

    #[test]
    fn test_thresholds() {
        assert_eq!(to_visualization_level(3.5), -127);
        assert_eq!(to_visualization_level(-2.5), 127);
        assert_eq!(to_visualization_level(0.5), 0);
        assert_eq!(to_visualization_level(2.5), -75);
        assert_eq!(to_visualization_level(1.5), -25);
        assert_eq!(to_visualization_level(-0.5), 25);
        assert_eq!(to_visualization_level(-1.5), 75);
    }

    #[test]
    fn test_boundaries_fall_through() {
        // strict comparisons: exact thresholds land in the next bucket down
        assert_eq!(to_visualization_level(3.0), -75);
        assert_eq!(to_visualization_level(0.0), 25);
        assert_eq!(to_visualization_level(-2.0), 127);
    }

    #[test]
    fn test_byte_is_bit_pattern() {
        assert_eq!(to_visualization_byte(3.5), 129);
        assert_eq!(to_visualization_byte(-2.5), 127);
        assert_eq!(to_visualization_byte(0.5), 0);
        assert_eq!(to_visualization_byte(2.5), 181);
    }

    #[test]
    fn test_ascii_layout() {
        let tensor = ModelTensor::from_values(
            (0..784).map(|i| if i % 28 == 0 { 1.0 } else { -1.0 }).collect(),
        )
        .unwrap();
        let text = to_ascii(&tensor);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 28);
        assert!(lines.iter().all(|l| l.len() == 28 * 2 - 1));
        assert!(lines[0].starts_with("* . ."));
    }

    #[test]
    fn test_reconstruction_of_blank_tensor() {
        let tensor = ModelTensor::from_values(vec![normalize_value(0); 784]).unwrap();
        let img = reconstruction_image(&tensor).unwrap();
        assert_eq!(img.dimensions(), (28, 28));
        assert!(img.pixels().all(|p| p.0[0] == 25));
    }

    #[test]
    fn test_render_crop_bgra() {
        let crop = SquareCrop {
            side: 1,
            offset_x: 0,
            offset_y: 0,
            layout: PixelLayout::Bgra8,
            data: vec![10, 20, 30, 255],
        };
        assert_eq!(render_crop(&crop).unwrap().get_pixel(0, 0).0, [30, 20, 10]);

        let opaque = SquareCrop {
            layout: PixelLayout::Other { channels: 1 },
            data: vec![1],
            ..crop
        };
        assert!(matches!(render_crop(&opaque), Err(FrameError::Render { stage: "crop", .. })));
    }
}
