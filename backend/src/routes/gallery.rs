use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query},
    Extension, Json,
};
use portfolio_storage::ImageRecord;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    gallery::{GalleryService, ImageFields, StagedUpload, MAX_UPLOAD_BYTES},
    middleware::AuthenticatedAdmin,
    types::AppError,
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GalleryQuery {
    /// `all`, `tattoo` or `mirror`; omitted means `all`
    pub category: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UploadResponse {
    pub message: String,
    pub image: ImageRecord,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Lists gallery images, most recent first
///
/// # Errors
///
/// - `AppError` - the record store could not be read
pub async fn list_images(
    Extension(gallery): Extension<Arc<GalleryService>>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<ImageRecord>>, AppError> {
    let images = gallery.list_images(query.category.as_deref()).await?;
    Ok(Json(images))
}

/// Uploads an image to the gallery
///
/// Expects a multipart form with an `image` file and optional `category`,
/// `title` and `description` text fields.
///
/// # Errors
///
/// - `AppError` 400 - no image, malformed form or rejected file
/// - `AppError` 500 - the media host refused the image, with details
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn upload_image(
    admin: AuthenticatedAdmin,
    Extension(gallery): Extension<Arc<GalleryService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    let mut fields = ImageFields::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let staged = StagedUpload::from_field(gallery.staging_dir(), field).await?;
                let oversized = staged.len() > MAX_UPLOAD_BYTES;
                upload = Some(staged);
                // The rest of the body is not worth reading
                if oversized {
                    break;
                }
            }
            "category" => fields.category = Some(field.text().await.map_err(multipart_error)?),
            "title" => fields.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                fields.description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::validation("No image provided"))?;
    let image = gallery.upload_image(upload, fields).await?;

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        image,
    }))
}

/// Deletes a gallery image
///
/// # Errors
///
/// - `AppError` 404 - no image has this id
#[instrument(skip(admin, gallery), fields(admin = %admin.username))]
pub async fn delete_image(
    admin: AuthenticatedAdmin,
    Extension(gallery): Extension<Arc<GalleryService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    gallery.delete_image(&id).await?;

    Ok(Json(MessageResponse {
        message: "Image deleted successfully".to_string(),
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::validation(err.body_text())
}
