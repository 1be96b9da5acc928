use image::imageops::{self, FilterType};
use tracing::debug;

use crate::error::FrameError;
use crate::types::{FixedPixelGrid, IntensityGrid, GRID_SIDE};

/// Resampling kernel used to bring the intensity grid down to 28x28.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ResampleKernel {
    /// Cubic spline, bicubic-equivalent.
    #[default]
    CatmullRom,
    Lanczos3,
    Triangle,
    Nearest,
}

impl ResampleKernel {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleKernel::CatmullRom => FilterType::CatmullRom,
            ResampleKernel::Lanczos3 => FilterType::Lanczos3,
            ResampleKernel::Triangle => FilterType::Triangle,
            ResampleKernel::Nearest => FilterType::Nearest,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "catmullrom" | "bicubic" | "cubic" => Some(ResampleKernel::CatmullRom),
            "lanczos3" | "lanczos" => Some(ResampleKernel::Lanczos3),
            "triangle" | "bilinear" => Some(ResampleKernel::Triangle),
            "nearest" => Some(ResampleKernel::Nearest),
            _ => None,
        }
    }
}

/// Isotropic scale of the square intensity grid to exactly 28x28.
///
/// The output must hold exactly 784 values; anything else is a
/// `FrameError::Resize` and the frame has to be dropped, never padded.
pub fn downsample(grid: &IntensityGrid, kernel: ResampleKernel) -> Result<FixedPixelGrid, FrameError> {
    let (w, h) = grid.0.dimensions();
    if w != h {
        return Err(FrameError::Resize(format!(
            "intensity grid is {}x{}, an isotropic scale to 28x28 needs a square",
            w, h
        )));
    }

    let side = GRID_SIDE as u32;
    let resized = imageops::resize(&grid.0, side, side, kernel.filter_type());
    debug!(from = w, to = side, ?kernel, "resampled intensity grid");

    FixedPixelGrid::from_vec(resized.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GRID_LEN;
    use image::GrayImage;

    #[test]
    fn test_downsample_size() {
        let grid = IntensityGrid(GrayImage::from_fn(100, 100, |x, y| image::Luma([((x + y) % 256) as u8])));
        let fixed = downsample(&grid, ResampleKernel::CatmullRom).unwrap();
        assert_eq!(fixed.view().len(), GRID_LEN);
        assert_eq!(fixed.view().dim(), (28, 28));
    }

    #[test]
    fn test_uniform_stays_uniform() {
        let grid = IntensityGrid(GrayImage::from_pixel(140, 140, image::Luma([90])));
        for kernel in [
            ResampleKernel::CatmullRom,
            ResampleKernel::Lanczos3,
            ResampleKernel::Triangle,
            ResampleKernel::Nearest,
        ] {
            let fixed = downsample(&grid, kernel).unwrap();
            assert!(fixed.view().iter().all(|&v| v == 90), "{:?}", kernel);
        }
    }

    #[test]
    fn test_non_square_grid_is_resize_error() {
        let grid = IntensityGrid(GrayImage::from_pixel(30, 20, image::Luma([0])));
        let err = downsample(&grid, ResampleKernel::default()).unwrap_err();
        assert!(matches!(err, FrameError::Resize(_)));
    }

    #[test]
    fn test_upsamples_small_crops() {
        let grid = IntensityGrid(GrayImage::from_pixel(7, 7, image::Luma([3])));
        assert_eq!(downsample(&grid, ResampleKernel::default()).unwrap().view().len(), GRID_LEN);
    }

    #[test]
    fn test_kernel_names() {
        assert_eq!(ResampleKernel::from_name("Bicubic"), Some(ResampleKernel::CatmullRom));
        assert_eq!(ResampleKernel::from_name("lanczos3"), Some(ResampleKernel::Lanczos3));
        assert_eq!(ResampleKernel::from_name("box"), None);
    }
}
