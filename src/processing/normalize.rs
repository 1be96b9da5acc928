use crate::types::{ModelTensor, ReorientedGrid};

/// Training-set pixel mean (fixed, not derived at runtime).
pub const MEAN: f32 = 0.1307;
/// Training-set pixel standard deviation.
pub const STD: f32 = 0.3081;

/// Map one 8-bit pixel to the zero-centered model scale. No clamping.
#[inline]
pub fn normalize_value(v: u8) -> f32 {
    (v as f32 / 255.0 - MEAN) / STD
}

pub fn normalize(grid: &ReorientedGrid) -> ModelTensor {
    ModelTensor(grid.view().mapv(normalize_value))
}
