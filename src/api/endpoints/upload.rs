//! `POST /upload` — prescription image → detected treatments → price comparison.

use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::comparison::rank_comparisons;
use crate::db::open_database;
use crate::models::{ComparisonRow, UserLocation};
use crate::pipeline::extraction::ocr_image_to_text;
use crate::pipeline::treatments::extract_top_treatments;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ocr_text: String,
    pub detected_treatments: Vec<String>,
    pub comparisons: Vec<ComparisonRow>,
}

/// Uploaded file as received from the multipart body.
struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// Form fields: `file` (required), `user_lat` and `user_lon` (optional).
///
/// A location that does not parse disables distances instead of failing
/// the request.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut user_lat: Option<String> = None;
    let mut user_lon: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            // Only parts carrying a filename are files; a bare `file` field is not.
            "file" => {
                if let Some(filename) = field.file_name().map(str::to_string) {
                    let bytes = field.bytes().await?;
                    file = Some(UploadedFile { filename, bytes });
                }
            }
            "user_lat" => user_lat = Some(field.text().await?),
            "user_lon" => user_lon = Some(field.text().await?),
            _ => {}
        }
    }

    let file = file.ok_or(ApiError::NoFile)?;
    if file.filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }

    let location = parse_location(user_lat.as_deref(), user_lon.as_deref());
    let upload_id = Uuid::new_v4();

    tracing::info!(
        %upload_id,
        filename = %file.filename,
        bytes = file.bytes.len(),
        with_location = location.is_some(),
        "Prescription upload received"
    );

    let response = tokio::task::spawn_blocking(move || process_upload(&ctx, &file, location))
        .await
        .map_err(|e| ApiError::Internal(format!("Upload task failed: {e}")))??;

    tracing::info!(
        %upload_id,
        treatments = ?response.detected_treatments,
        comparisons = response.comparisons.len(),
        "Prescription processed"
    );

    Ok(Json(response))
}

/// Blocking part of an upload: stage, OCR, detect, compare.
/// The staged file is removed when this returns, on success or failure.
fn process_upload(
    ctx: &ApiContext,
    file: &UploadedFile,
    location: Option<UserLocation>,
) -> Result<UploadResponse, ApiError> {
    let suffix = extension_suffix(&file.filename);
    let mut builder = tempfile::Builder::new();
    builder.prefix("medicost-").suffix(&suffix);
    let mut staged = match ctx.staging_dir.as_deref() {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| ApiError::Internal(format!("Staging file: {e}")))?;
    staged
        .write_all(&file.bytes)
        .and_then(|()| staged.flush())
        .map_err(|e| ApiError::Internal(format!("Staging file: {e}")))?;

    let ocr_text = ocr_image_to_text(ctx.ocr.as_ref(), staged.path())?;
    let detected_treatments = extract_top_treatments(&ocr_text, ctx.top_n);

    let comparisons = if detected_treatments.is_empty() {
        Vec::new()
    } else {
        let conn = open_database(&ctx.db_path)?;
        rank_comparisons(&detected_treatments, location, &conn)?
    };

    Ok(UploadResponse {
        ocr_text,
        detected_treatments,
        comparisons,
    })
}

/// Both coordinates must parse for a location to be used.
/// Blank fields count as absent.
fn parse_location(lat: Option<&str>, lon: Option<&str>) -> Option<UserLocation> {
    let lat = parse_coordinate(lat)?;
    let lon = parse_coordinate(lon)?;
    Some(UserLocation { lat, lon })
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring malformed coordinate");
            None
        }
    }
}

/// `.png` for `scan.png`; empty when the name has no extension.
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_needs_both_coordinates() {
        assert_eq!(
            parse_location(Some("17.4410"), Some("78.4550")),
            Some(UserLocation { lat: 17.4410, lon: 78.4550 })
        );
        assert_eq!(parse_location(Some("17.4410"), None), None);
        assert_eq!(parse_location(None, Some("78.4550")), None);
        assert_eq!(parse_location(Some(""), Some("78.4550")), None);
    }

    #[test]
    fn malformed_coordinate_disables_location() {
        assert_eq!(parse_location(Some("north"), Some("78.4550")), None);
        assert_eq!(parse_location(Some("17.44"), Some("78,45")), None);
    }

    #[test]
    fn coordinates_tolerate_whitespace() {
        assert_eq!(
            parse_location(Some(" 17.5 "), Some("\t78.5\n")),
            Some(UserLocation { lat: 17.5, lon: 78.5 })
        );
    }

    #[test]
    fn suffix_keeps_extension() {
        assert_eq!(extension_suffix("scan.png"), ".png");
        assert_eq!(extension_suffix("rx.final.JPG"), ".JPG");
        assert_eq!(extension_suffix("prescription"), "");
        assert_eq!(extension_suffix(".hidden"), "");
    }
}
