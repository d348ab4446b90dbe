pub mod api;
pub mod comparison;
pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext};
use crate::config::ServerConfig;
use crate::db::{init_database, DatabaseError};
use crate::pipeline::extraction::{ExtractionError, OcrEngine};

/// Startup failures surfaced by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("OCR engine error: {0}")]
    Ocr(#[from] ExtractionError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Pick the OCR engine for this build.
#[cfg(feature = "ocr")]
pub fn build_ocr_engine(config: &ServerConfig) -> Result<Arc<dyn OcrEngine>, ExtractionError> {
    let engine = pipeline::extraction::BundledTesseract::new(config.tessdata_dir.as_deref())?;
    Ok(Arc::new(engine))
}

/// Pick the OCR engine for this build.
#[cfg(not(feature = "ocr"))]
pub fn build_ocr_engine(config: &ServerConfig) -> Result<Arc<dyn OcrEngine>, ExtractionError> {
    if config.tessdata_dir.is_some() {
        tracing::warn!("Tessdata directory set but OCR support is not compiled in");
    }
    tracing::warn!("Built without the `ocr` feature; image uploads will fail, text uploads still work");
    Ok(Arc::new(pipeline::extraction::UnavailableOcrEngine))
}

/// Initialize logging, seed the database if needed, and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let created = init_database(&config.db_path)?;
    tracing::info!(
        path = %config.db_path.display(),
        created,
        "Hospital database ready"
    );

    let ocr = build_ocr_engine(&config)?;
    let ctx = ApiContext::new(config.db_path.clone(), ocr)
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_staging_dir(config.staging_dir.clone());

    let mut server = start_server(ctx, config.bind_addr)
        .await
        .map_err(AppError::Server)?;
    tracing::info!("Listening on http://{}", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    server.shutdown();
    server.wait().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
