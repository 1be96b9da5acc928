use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{FrameError, InferenceError};
use crate::inference::{checked_infer, InferenceEngine};
use crate::processing::resample::ResampleKernel;
use crate::processing::{color, crop, normalize, orient, resample};
use crate::ranking::rank_raw;
use crate::slot::ResultSlot;
use crate::source::FrameSource;
use crate::types::{ModelTensor, PredictionResult, RawFrame, StageImages};
use crate::visualize;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Produce a negative intensity image (dark strokes become bright).
    pub invert: bool,
    pub resample: ResampleKernel,
    /// Attach crop / intensity / resized bitmaps to each result.
    pub render_stages: bool,
    /// Attach the quantized reconstruction bitmap to each result.
    pub visualize: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            invert: false,
            resample: ResampleKernel::CatmullRom,
            render_stages: true,
            visualize: true,
        }
    }
}

/// Receives finished results for presentation.
pub trait ResultSink {
    fn present(&self, result: PredictionResult);
}

impl ResultSink for ResultSlot {
    fn present(&self, result: PredictionResult) {
        let generation = self.publish(result);
        debug!(generation, "published prediction");
    }
}

/// Receives the ASCII rendering of each tensor. Purely diagnostic.
pub trait DebugSink: Send + Sync {
    fn ascii(&self, text: &str);
}

/// Logs the ASCII tensor at debug level.
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn ascii(&self, text: &str) {
        debug!("tensor:\n{}", text);
    }
}

pub struct NullDebugSink;

impl DebugSink for NullDebugSink {
    fn ascii(&self, _text: &str) {}
}

/// Model input for one frame plus its display bitmaps.
pub struct PreparedFrame {
    pub tensor: ModelTensor,
    pub stages: StageImages,
}

/// A frame that made it through preprocessing.
#[derive(Debug)]
pub enum Evaluation {
    Predicted(PredictionResult),
    /// The engine failed; the frame maps to the all-sentinel result.
    NoPrediction(InferenceError),
}

impl Evaluation {
    pub fn into_result(self) -> PredictionResult {
        match self {
            Evaluation::Predicted(result) => result,
            Evaluation::NoPrediction(_) => PredictionResult::empty(),
        }
    }
}

/// What happened to one frame in `process_frame`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Predicted,
    /// Sentinel result published.
    NoPrediction(InferenceError),
    /// Nothing published; the previous result stays visible.
    Abandoned(FrameError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub frames: usize,
    pub predicted: usize,
    pub no_prediction: usize,
    pub abandoned: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
    debug_sink: Box<dyn DebugSink>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline {
            config,
            debug_sink: Box::new(TracingDebugSink),
        }
    }

    pub fn with_debug_sink(mut self, sink: Box<dyn DebugSink>) -> Self {
        self.debug_sink = sink;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Crop, intensity, resample, reorient and normalize one frame.
    pub fn prepare(&self, frame: &RawFrame) -> Result<PreparedFrame, FrameError> {
        let square = crop::crop(frame)?;
        let intensity = color::to_intensity(&square, self.config.invert)?;
        let fixed = resample::downsample(&intensity, self.config.resample)?;
        let tensor = normalize::normalize(&orient::reorient(&fixed));

        let mut stages = StageImages::default();
        if self.config.render_stages {
            stages.crop = match visualize::render_crop(&square) {
                Ok(img) => Some(img),
                Err(e) => {
                    warn!(error = %e, "dropping crop bitmap");
                    None
                }
            };
            stages.intensity = Some(intensity.0);
            stages.resized = Some(fixed.to_gray_image());
        }

        Ok(PreparedFrame { tensor, stages })
    }

    /// Prepare a frame and run it through the engine.
    pub fn evaluate<E>(&self, frame: &RawFrame, engine: &E) -> Result<Evaluation, FrameError>
    where
        E: InferenceEngine + ?Sized,
    {
        let prepared = self.prepare(frame)?;
        self.debug_sink.ascii(&visualize::to_ascii(&prepared.tensor));

        let scores = match checked_infer(engine, &prepared.tensor) {
            Ok(scores) => scores,
            Err(e) => return Ok(Evaluation::NoPrediction(e)),
        };

        let visualization = if self.config.visualize {
            visualize::reconstruction_image(&prepared.tensor)
                .map_err(|e| warn!(error = %e, "dropping reconstruction bitmap"))
                .ok()
        } else {
            None
        };

        Ok(Evaluation::Predicted(PredictionResult {
            top: rank_raw(&scores),
            visualization,
            stages: prepared.stages,
        }))
    }

    /// Evaluate one frame and publish the outcome.
    ///
    /// Abandoned frames publish nothing. Engine failures publish the
    /// sentinel result.
    pub fn process_frame<E, S>(&self, frame: &RawFrame, engine: &E, sink: &S) -> FrameOutcome
    where
        E: InferenceEngine + ?Sized,
        S: ResultSink + ?Sized,
    {
        match self.evaluate(frame, engine) {
            Ok(Evaluation::Predicted(result)) => {
                debug!(top = ?result.first(), "frame classified");
                sink.present(result);
                FrameOutcome::Predicted
            }
            Ok(Evaluation::NoPrediction(e)) => {
                warn!(error = %e, "inference failed, publishing empty prediction");
                sink.present(PredictionResult::empty());
                FrameOutcome::NoPrediction(e)
            }
            Err(e) => {
                warn!(error = %e, "abandoning frame");
                FrameOutcome::Abandoned(e)
            }
        }
    }

    /// Drain a frame source, publishing each frame's result in order.
    pub fn run<E, S>(&self, source: &mut dyn FrameSource, engine: &E, sink: &S) -> RunStats
    where
        E: InferenceEngine + ?Sized,
        S: ResultSink + ?Sized,
    {
        let mut stats = RunStats::default();
        while let Some(next) = source.next_frame() {
            stats.frames += 1;
            let frame = match next {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "frame source failed");
                    stats.abandoned += 1;
                    continue;
                }
            };
            match self.process_frame(&frame, engine, sink) {
                FrameOutcome::Predicted => stats.predicted += 1,
                FrameOutcome::NoPrediction(_) => stats.no_prediction += 1,
                FrameOutcome::Abandoned(_) => stats.abandoned += 1,
            }
        }
        stats
    }

    /// Evaluate independent frames in parallel. Results keep input order.
    pub fn classify_batch<E>(
        &self,
        frames: &[RawFrame],
        engine: &E,
    ) -> Vec<Result<Evaluation, FrameError>>
    where
        E: InferenceEngine + ?Sized,
    {
        frames
            .par_iter()
            .map(|frame| self.evaluate(frame, engine))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(PipelineConfig::default())
    }
}
