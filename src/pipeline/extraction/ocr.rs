use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use super::types::{ExtractionMethod, ExtractionResult, OcrEngine, OcrPageResult};
use super::ExtractionError;

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    /// `None` lets Tesseract use its compiled-in tessdata location.
    tessdata_dir: Option<std::path::PathBuf>,
    default_lang: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with an optional tessdata directory, English by default.
    pub fn new(tessdata_dir: Option<&Path>) -> Result<Self, ExtractionError> {
        if let Some(dir) = tessdata_dir {
            if !dir.join("eng.traineddata").exists() {
                return Err(ExtractionError::OcrInit(format!(
                    "eng.traineddata not found in {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            tessdata_dir: tessdata_dir.map(Path::to_path_buf),
            default_lang: "eng".to_string(),
        })
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        self.ocr_image_with_lang(image_bytes, &self.default_lang)
    }

    fn ocr_image_with_lang(
        &self,
        image_bytes: &[u8],
        lang: &str,
    ) -> Result<OcrPageResult, ExtractionError> {
        let tessdata = match &self.tessdata_dir {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| ExtractionError::OcrInit("Invalid tessdata path".into()))?,
            ),
            None => None,
        };

        let tess = tesseract::Tesseract::new(tessdata, Some(lang))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        let confidence = tess.mean_text_conf().max(0) as f32 / 100.0;

        Ok(OcrPageResult { text, confidence })
    }
}

/// Stand-in engine for builds without the `ocr` feature.
/// Plain-text uploads still work; images fail with [`ExtractionError::OcrInit`].
pub struct UnavailableOcrEngine;

impl OcrEngine for UnavailableOcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        self.ocr_image_with_lang(image_bytes, "eng")
    }

    fn ocr_image_with_lang(
        &self,
        _image_bytes: &[u8],
        _lang: &str,
    ) -> Result<OcrPageResult, ExtractionError> {
        Err(ExtractionError::OcrInit(
            "OCR engine not available: built without the `ocr` feature".into(),
        ))
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        self.ocr_image_with_lang(image_bytes, "eng")
    }

    fn ocr_image_with_lang(
        &self,
        _image_bytes: &[u8],
        _lang: &str,
    ) -> Result<OcrPageResult, ExtractionError> {
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

/// Extract text from an uploaded file.
///
/// Images are decoded, converted to RGB and handed to `engine`. Files that
/// are already UTF-8 text are read directly. Either way the result has each
/// line trimmed and blank lines removed.
pub fn extract_text(
    engine: &dyn OcrEngine,
    path: &Path,
) -> Result<ExtractionResult, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::ImageNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;

    if let Some(text) = as_plain_text(&bytes) {
        tracing::debug!(path = %path.display(), "Upload is plain text, skipping OCR");
        return Ok(ExtractionResult {
            method: ExtractionMethod::PlainTextRead,
            full_text: normalize_ocr_text(text),
            confidence: 1.0,
        });
    }

    let png = prepare_image(&bytes)?;
    let page = engine.ocr_image(&png)?;

    tracing::info!(
        path = %path.display(),
        confidence = page.confidence,
        chars = page.text.len(),
        "OCR complete"
    );

    Ok(ExtractionResult {
        method: ExtractionMethod::TesseractOcr,
        full_text: normalize_ocr_text(&page.text),
        confidence: page.confidence,
    })
}

/// OCR an image file and return its normalized text.
pub fn ocr_image_to_text(engine: &dyn OcrEngine, path: &Path) -> Result<String, ExtractionError> {
    extract_text(engine, path).map(|result| result.full_text)
}

/// Decode any supported image and re-encode it as an RGB PNG.
pub fn prepare_image(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Trim every line and drop the blank ones.
///
/// Lone `\r`, form feeds and the Unicode line separators also end a line.
pub fn normalize_ocr_text(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// `Some` when the bytes are UTF-8 text rather than a known image format.
fn as_plain_text(bytes: &[u8]) -> Option<&str> {
    if image::guess_format(bytes).is_ok() || bytes.contains(&0) {
        return None;
    }
    std::str::from_utf8(bytes).ok()
}
