//! Error types for the scanning core.

/// Errors that can occur while scoring a single image.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The input could not be interpreted as an image.
    #[error("cannot decode image: {0}")]
    Decode(String),
    /// The feature extractor failed to load or run.
    #[error("model error: {0}")]
    Model(String),
}

impl From<ort::Error> for ScanError {
    fn from(e: ort::Error) -> Self {
        ScanError::Model(e.to_string())
    }
}
