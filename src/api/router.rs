//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the application router.
///
/// Routes:
/// - `GET /` upload page
/// - `GET /health` liveness
/// - `POST /upload` prescription upload (multipart)
pub fn api_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.max_upload_bytes;

    Router::new()
        .route("/", get(endpoints::index::page))
        .route("/health", get(endpoints::health::check))
        .route("/upload", post(endpoints::upload::upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
