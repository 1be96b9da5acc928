//! Camera frame to classifier tensor, and classifier scores to a ranked top-3.

pub mod error;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod ranking;
pub mod reader;
pub mod slot;
pub mod source;
pub mod types;
pub mod visualize;

pub use error::{FrameError, InferenceError, LoadError};
pub use inference::{FnEngine, InferenceEngine, LoadModel};
pub use pipeline::{DebugSink, Evaluation, FrameOutcome, Pipeline, PipelineConfig, ResultSink, RunStats};
pub use processing::resample::ResampleKernel;
pub use reader::{load_engine, DigitReader};
pub use slot::{ResultSlot, Snapshot};
pub use types::{ClassScore, ModelTensor, PixelLayout, PredictionResult, RawFrame};
