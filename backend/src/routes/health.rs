use std::sync::Arc;

use aide::axum::IntoApiResponse;
use axum::{http::StatusCode, Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;

use crate::gallery::GalleryService;

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the record store cannot be read
    status: &'static str,
    /// Whether the store document loaded
    store_readable: bool,
    /// Current version of the application
    semver: &'static str,
    /// Commit hash of the current build (if available)
    rev: Option<&'static str>,
}

/// Health check endpoint
///
/// Answers 503 while the record store document is missing or corrupt.
pub async fn handler(Extension(gallery): Extension<Arc<GalleryService>>) -> impl IntoApiResponse {
    let store_readable = gallery.store_readable().await;
    let (code, status) = if store_readable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            store_readable,
            semver: env!("CARGO_PKG_VERSION"),
            rev: option_env!("GIT_REV"),
        }),
    )
}
