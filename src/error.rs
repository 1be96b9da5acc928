use thiserror::Error;

/// Per-frame failures. Geometry, filter and resize errors abandon the frame;
/// render errors only drop a display bitmap.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("invalid frame geometry: {0}")]
    Geometry(String),
    #[error("intensity filter unavailable: {0}")]
    Filter(String),
    #[error("downsample failed: {0}")]
    Resize(String),
    #[error("could not render {stage} bitmap: {reason}")]
    Render { stage: &'static str, reason: String },
}

/// The classifier could not produce a usable set of scores.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("inference engine unavailable: {0}")]
    Unavailable(String),
    #[error("input buffer holds {len} values, expected 784")]
    MalformedInput { len: usize },
    #[error("engine returned {got} scores, expected {expected}")]
    ClassCount { expected: usize, got: usize },
    #[error("inference failed: {0}")]
    Internal(String),
}

/// Startup model load failure. Not recoverable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
}
