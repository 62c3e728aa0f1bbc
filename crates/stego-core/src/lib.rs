//! stego-core — shared library for image steganography risk scanning.
//!
//! Provides image preprocessing, ONNX feature extraction, risk scoring,
//! session history aggregation, scan orchestration, and result reporting
//! used by the CLI frontend.

pub mod error;
pub mod extractor;
pub mod preprocess;
pub mod report;
pub mod scan;
pub mod score;
pub mod session;

pub use error::ScanError;
