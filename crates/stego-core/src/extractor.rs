//! Feature extraction via a pretrained ONNX embedding model.
//!
//! The extractor is a general-purpose image embedding network, not a
//! stego-specific model; scoring only needs the fixed-length embedding it
//! produces. The session is loaded once and is read-only afterwards.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use crate::error::ScanError;

/// Anything that turns a preprocessed image tensor into an embedding.
///
/// The scorer depends on this trait rather than on `ort` directly, so tests
/// can substitute a stub extractor.
pub trait FeatureExtractor: Send + Sync {
    fn embed(&self, input: &Array4<f32>) -> Result<Vec<f32>, ScanError>;
}

/// ONNX-backed extractor using the `ort` crate.
pub struct OnnxExtractor {
    session: Mutex<Session>,
}

impl OnnxExtractor {
    /// Load an ONNX embedding model from the given path.
    pub fn load(model_path: &Path) -> Result<Self, ScanError> {
        let session = Session::builder()?
            .with_intra_threads(4)?
            .commit_from_file(model_path)?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FeatureExtractor for OnnxExtractor {
    /// Run inference on a single (1, 3, 224, 224) tensor and flatten the
    /// output into an embedding vector.
    fn embed(&self, input: &Array4<f32>) -> Result<Vec<f32>, ScanError> {
        let input_tensor = TensorRef::from_array_view(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ScanError::Model(format!("session lock poisoned: {e}")))?;
        let outputs = session.run(ort::inputs!["input" => input_tensor])?;

        let embedding = outputs["output"].try_extract_array::<f32>()?;
        Ok(embedding.iter().copied().collect())
    }
}
