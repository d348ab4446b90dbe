pub mod ocr;
pub mod types;

pub use ocr::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Tesseract OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}

impl From<image::ImageError> for ExtractionError {
    fn from(err: image::ImageError) -> Self {
        ExtractionError::ImageProcessing(err.to_string())
    }
}
