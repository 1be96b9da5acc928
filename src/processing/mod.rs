//! Per-frame pixel stages, leaf-first: crop, intensity, resample, orient, normalize.

pub mod color;
pub mod crop;
pub mod normalize;
pub mod orient;
pub mod resample;
