use axum::Json;
use portfolio_storage::Category;
use schemars::JsonSchema;
use serde::Serialize;

use crate::gallery::{ALLOWED_IMAGE_SUBTYPES, MAX_UPLOAD_BYTES};

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Maximum image size in bytes
    max_upload_bytes: u64,
    /// Accepted image MIME types
    allowed_image_types: Vec<String>,
    /// Gallery categories
    categories: Vec<Category>,
}

/// Upload limits and categories, so clients can validate before sending
#[allow(clippy::unused_async)]
pub async fn get_config() -> Json<ConfigResponse> {
    Json(ConfigResponse {
        max_upload_bytes: MAX_UPLOAD_BYTES,
        allowed_image_types: ALLOWED_IMAGE_SUBTYPES
            .iter()
            .map(|subtype| format!("image/{subtype}"))
            .collect(),
        categories: Category::ALL.to_vec(),
    })
}
