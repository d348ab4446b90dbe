//! Shared types for the HTTP layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TOP_N};
use crate::pipeline::extraction::OcrEngine;

/// Shared context for all routes. Cheap to clone; nothing in it is mutated
/// after startup.
#[derive(Clone)]
pub struct ApiContext {
    /// Seeded hospital database, opened read-only per request.
    pub db_path: Arc<PathBuf>,
    pub ocr: Arc<dyn OcrEngine>,
    /// Maximum number of treatment codes kept per prescription.
    pub top_n: usize,
    pub max_upload_bytes: usize,
    /// Where uploads are staged for OCR. `None` uses the system temp dir.
    pub staging_dir: Option<Arc<PathBuf>>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            ocr,
            top_n: DEFAULT_TOP_N,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            staging_dir: None,
        }
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_staging_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.staging_dir = dir.map(Arc::new);
        self
    }
}
