//! Bundled upload page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../resources/index.html");

/// `GET /` — browser form that posts to `/upload`.
pub async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
