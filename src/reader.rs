use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::inference::LoadModel;
use crate::pipeline::{NullDebugSink, Pipeline, PipelineConfig, PreparedFrame};
use crate::processing::resample::ResampleKernel;
use crate::source::{FrameSource, ImageFileSource};

/// Builder for a configured digit pipeline.
pub struct DigitReader {
    invert: bool,
    kernel: ResampleKernel,
    render_stages: bool,
    visualize: bool,
    ascii_debug: bool,
}

impl DigitReader {
    pub fn new() -> Self {
        DigitReader {
            invert: false,
            kernel: ResampleKernel::CatmullRom,
            render_stages: true,
            visualize: true,
            ascii_debug: true,
        }
    }

    pub fn with_inversion(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn with_kernel(mut self, kernel: ResampleKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn without_stage_images(mut self) -> Self {
        self.render_stages = false;
        self
    }

    pub fn without_visualization(mut self) -> Self {
        self.visualize = false;
        self
    }

    pub fn without_ascii_debug(mut self) -> Self {
        self.ascii_debug = false;
        self
    }

    pub fn build(&self) -> Pipeline {
        let config = PipelineConfig {
            invert: self.invert,
            resample: self.kernel,
            render_stages: self.render_stages,
            visualize: self.visualize,
        };
        let pipeline = Pipeline::new(config);
        if self.ascii_debug {
            pipeline
        } else {
            pipeline.with_debug_sink(Box::new(NullDebugSink))
        }
    }

    /// Decode an image file and prepare it as one frame, without inference.
    pub fn prepare_file<P: AsRef<Path>>(&self, path: P) -> Result<PreparedFrame> {
        let path = path.as_ref();
        let frame = ImageFileSource::new([path])
            .next_frame()
            .context("Frame source returned no frame")??;
        self.build()
            .prepare(&frame)
            .with_context(|| format!("Failed to prepare {}", path.display()))
    }
}

impl Default for DigitReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the classifier once at startup. Failure here is fatal to the caller.
pub fn load_engine<E: LoadModel>(model_ref: &Path) -> Result<E> {
    let engine = E::load(model_ref)
        .with_context(|| format!("Failed to load model {}", model_ref.display()))?;
    info!(model = %model_ref.display(), classes = engine.num_classes(), "model loaded");
    Ok(engine)
}
