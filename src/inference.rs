use std::path::Path;

use crate::error::{InferenceError, LoadError};
use crate::types::{ModelTensor, GRID_LEN, NUM_CLASSES};

/// A loaded classifier. Owned by the caller and borrowed by each frame.
pub trait InferenceEngine: Send + Sync {
    /// Raw per-class scores for one tensor; position is the class index.
    fn infer(&self, tensor: &ModelTensor) -> Result<Vec<f32>, InferenceError>;

    fn num_classes(&self) -> usize {
        NUM_CLASSES
    }
}

/// Engines that are created from an external model asset at startup.
pub trait LoadModel: InferenceEngine + Sized {
    fn load(model_ref: &Path) -> Result<Self, LoadError>;
}

/// Closure-backed engine, for stubs and foreign runtimes.
pub struct FnEngine<F> {
    f: F,
    classes: usize,
}

impl<F> FnEngine<F>
where
    F: Fn(&[f32]) -> Result<Vec<f32>, InferenceError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnEngine {
            f,
            classes: NUM_CLASSES,
        }
    }

    pub fn with_classes(mut self, classes: usize) -> Self {
        self.classes = classes;
        self
    }
}

impl<F> InferenceEngine for FnEngine<F>
where
    F: Fn(&[f32]) -> Result<Vec<f32>, InferenceError> + Send + Sync,
{
    fn infer(&self, tensor: &ModelTensor) -> Result<Vec<f32>, InferenceError> {
        let input = tensor.as_slice();
        if input.len() != GRID_LEN {
            return Err(InferenceError::MalformedInput { len: input.len() });
        }
        (self.f)(input)
    }

    fn num_classes(&self) -> usize {
        self.classes
    }
}

/// Run the engine and insist on exactly one score per class.
pub fn checked_infer<E: InferenceEngine + ?Sized>(
    engine: &E,
    tensor: &ModelTensor,
) -> Result<Vec<f32>, InferenceError> {
    let scores = engine.infer(tensor)?;
    let expected = engine.num_classes();
    if scores.len() != expected {
        return Err(InferenceError::ClassCount {
            expected,
            got: scores.len(),
        });
    }
    Ok(scores)
}
