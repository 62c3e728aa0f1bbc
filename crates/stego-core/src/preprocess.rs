//! Image decoding and normalization ahead of feature extraction.
//!
//! Every image, regardless of size or aspect ratio, becomes a fixed tensor
//! of shape (1, 3, 224, 224): resized to a 224x224 square, converted to
//! RGB, and scaled to [0, 1] in channel-first (NCHW) layout.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use crate::error::ScanError;

/// Side length of the square input the extractor expects.
pub const INPUT_DIM: u32 = 224;

/// Decode an image file from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, ScanError> {
    image::open(path).map_err(|e| ScanError::Decode(format!("{}: {e}", path.display())))
}

/// Normalize a decoded image into the extractor's input tensor.
pub fn preprocess(img: &DynamicImage) -> Array4<f32> {
    let resized = img
        .resize_exact(INPUT_DIM, INPUT_DIM, FilterType::Triangle)
        .to_rgb8();

    let dim = INPUT_DIM as usize;
    let mut input = Array4::<f32>::zeros((1, 3, dim, dim));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    input
}
