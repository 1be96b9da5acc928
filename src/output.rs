use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::GrayImage;

use crate::types::{ModelTensor, PredictionResult, StageImages};

/// Write the tensor as 784 little-endian f32 values, row-major.
pub fn save_tensor_f32le<P: AsRef<Path>>(tensor: &ModelTensor, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).context("Failed to create tensor file")?;
    let mut out = BufWriter::new(file);
    for v in tensor.as_slice() {
        out.write_all(&v.to_le_bytes())
            .context("Failed to write tensor")?;
    }
    out.flush().context("Failed to flush tensor file")?;
    Ok(())
}

pub fn save_gray_png<P: AsRef<Path>>(image: &GrayImage, path: P) -> Result<()> {
    image
        .save_with_format(path.as_ref(), image::ImageFormat::Png)
        .with_context(|| format!("Failed to save {}", path.as_ref().display()))
}

/// Save every available stage bitmap into `dir`. Returns how many were written.
pub fn save_stage_images<P: AsRef<Path>>(stages: &StageImages, dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).context("Failed to create stage directory")?;

    let mut written = 0;
    if let Some(crop) = &stages.crop {
        crop.save_with_format(dir.join("crop.png"), image::ImageFormat::Png)
            .context("Failed to save crop bitmap")?;
        written += 1;
    }
    if let Some(intensity) = &stages.intensity {
        save_gray_png(intensity, dir.join("intensity.png"))?;
        written += 1;
    }
    if let Some(resized) = &stages.resized {
        save_gray_png(resized, dir.join("resized.png"))?;
        written += 1;
    }
    Ok(written)
}

/// Save stage bitmaps plus the reconstruction visualization, if present.
pub fn save_result_images<P: AsRef<Path>>(result: &PredictionResult, dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    let mut written = save_stage_images(&result.stages, dir)?;
    if let Some(vis) = &result.visualization {
        save_gray_png(vis, dir.join("reconstruction.png"))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};

    #[test]
    fn test_tensor_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        let values: Vec<f32> = (0..784).map(|i| i as f32 * 0.5).collect();
        save_tensor_f32le(&ModelTensor::from_values(values).unwrap(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 784 * 4);
        assert_eq!(f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 0.5);
    }

    #[test]
    fn test_save_result_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = PredictionResult::empty();
        result.stages.crop = Some(RgbImage::new(4, 4));
        result.stages.resized = Some(GrayImage::from_pixel(28, 28, Luma([1])));
        result.visualization = Some(GrayImage::new(28, 28));

        let written = save_result_images(&result, dir.path().join("out")).unwrap();
        assert_eq!(written, 3);
        assert!(dir.path().join("out/crop.png").exists());
        assert!(!dir.path().join("out/intensity.png").exists());
        assert!(dir.path().join("out/reconstruction.png").exists());
    }
}
