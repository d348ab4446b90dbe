use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text pulled out of one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub method: ExtractionMethod,
    /// Trimmed lines, blank lines removed, joined with `\n`.
    pub full_text: String,
    pub confidence: f32,
}

/// How text was extracted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtractionMethod {
    TesseractOcr,
    PlainTextRead,
}

/// Raw OCR result from the engine
#[derive(Debug)]
pub struct OcrPageResult {
    pub text: String,
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests).
///
/// Engines receive an RGB PNG produced by [`super::prepare_image`].
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;

    fn ocr_image_with_lang(
        &self,
        image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, ExtractionError>;
}
