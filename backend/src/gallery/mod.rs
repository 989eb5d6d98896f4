//! Gallery service
//!
//! Keeps image records in the record store in step with the assets at the media
//! host. The two sides are not updated atomically:
//!
//! - an upload stores the asset first and the record second, so a failed save
//!   leaves an orphaned remote asset but never a record without an asset;
//! - a delete removes the record first and then asks the media host to delete the
//!   asset, ignoring failures, so the gallery listing is always consistent with
//!   what the admin asked for.

mod error;
mod staging;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use mime::Mime;
use portfolio_storage::{new_record_id, Category, ImageRecord, RecordStore};
use tracing::{error, info, instrument, warn};

pub use error::{GalleryError, GalleryResult};
pub use staging::StagedUpload;

use crate::media_storage::{MediaGateway, UploadOptions};

/// Largest accepted upload (5 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
/// Category filter value that matches every image
pub const ALL_CATEGORIES: &str = "all";
/// MIME subtypes accepted for uploads
pub const ALLOWED_IMAGE_SUBTYPES: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Optional metadata sent along with an upload
#[derive(Debug, Clone, Default)]
pub struct ImageFields {
    /// Requested category, `tattoo` when absent or empty
    pub category: Option<String>,
    /// Title of the image
    pub title: Option<String>,
    /// Description of the image
    pub description: Option<String>,
}

/// Orchestrates the record store and the media host for gallery images
pub struct GalleryService {
    record_store: Arc<RecordStore>,
    media_gateway: Arc<dyn MediaGateway>,
    folder_prefix: String,
    staging_dir: PathBuf,
}

impl GalleryService {
    /// Creates a new gallery service
    ///
    /// Assets are stored under `{folder_prefix}/{category}` at the media host.
    #[must_use]
    pub fn new(
        record_store: Arc<RecordStore>,
        media_gateway: Arc<dyn MediaGateway>,
        folder_prefix: impl Into<String>,
    ) -> Self {
        Self {
            record_store,
            media_gateway,
            folder_prefix: folder_prefix.into(),
            staging_dir: std::env::temp_dir().join("portfolio-uploads"),
        }
    }

    /// Sets the directory incoming uploads are spooled to
    #[must_use]
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    /// Directory incoming uploads are spooled to
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Whether the store document can currently be read
    pub async fn store_readable(&self) -> bool {
        self.record_store.load().await.is_ok()
    }

    /// Lists images, most recent first
    ///
    /// `None` and `"all"` return every image. Any other value returns the images of
    /// that category, which is nothing for values that are not a category.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Store` if the record store cannot be read
    pub async fn list_images(
        &self,
        category_filter: Option<&str>,
    ) -> GalleryResult<Vec<ImageRecord>> {
        let document = self.record_store.load().await?;

        let mut images: Vec<ImageRecord> = match category_filter {
            None | Some(ALL_CATEGORIES) => document.images,
            Some(filter) => match Category::from_str(filter) {
                Ok(category) => document
                    .images
                    .into_iter()
                    .filter(|image| image.category == category)
                    .collect(),
                Err(_) => Vec::new(),
            },
        };

        images.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(images)
    }

    /// Validates an upload, stores it at the media host and records it
    ///
    /// The staged file is consumed and removed on every exit path.
    ///
    /// # Errors
    ///
    /// - `GalleryError::Validation` - bad MIME type, extension, size or category
    /// - `GalleryError::Upload` - the media host refused the asset
    /// - `GalleryError::Staging` - the staged file could not be read back
    /// - `GalleryError::Store` - the record could not be saved
    #[instrument(skip_all, fields(len = upload.len()))]
    pub async fn upload_image(
        &self,
        upload: StagedUpload,
        fields: ImageFields,
    ) -> GalleryResult<ImageRecord> {
        validate_upload(&upload)?;
        let category = resolve_category(fields.category.as_deref())?;

        let bytes = upload.read().await?;
        let record = self
            .store_image(
                bytes,
                category,
                fields.title.unwrap_or_default(),
                fields.description.unwrap_or_default(),
            )
            .await?;

        // `upload` is dropped here, removing the staged file
        Ok(record)
    }

    /// Stores already validated bytes and records them
    ///
    /// Used by the bulk importer, which applies its own file selection rules.
    ///
    /// # Errors
    ///
    /// - `GalleryError::Upload` - the media host refused the asset
    /// - `GalleryError::Store` - the record could not be saved
    pub async fn import_image(
        &self,
        bytes: Vec<u8>,
        category: Category,
        title: String,
    ) -> GalleryResult<ImageRecord> {
        self.store_image(bytes, category, title, String::new()).await
    }

    /// Deletes an image record and, best effort, its asset
    ///
    /// # Errors
    ///
    /// - `GalleryError::NotFound` - no image has this id, nothing is changed
    /// - `GalleryError::Store` - the record store could not be updated
    #[instrument(skip(self))]
    pub async fn delete_image(&self, id: &str) -> GalleryResult<()> {
        let removed = self
            .record_store
            .try_update(|document| {
                let index = document
                    .images
                    .iter()
                    .position(|image| image.id == id)
                    .ok_or_else(|| GalleryError::NotFound(id.to_string()))?;
                Ok::<_, GalleryError>(document.images.remove(index))
            })
            .await?;

        info!(media_id = %removed.media_id, "Image record deleted");

        // Legacy records may lack a media id
        if !removed.media_id.is_empty() {
            if let Err(e) = self.media_gateway.delete(&removed.media_id).await {
                warn!(media_id = %removed.media_id, "Remote asset left behind: {e}");
            }
        }

        Ok(())
    }

    async fn store_image(
        &self,
        bytes: Vec<u8>,
        category: Category,
        title: String,
        description: String,
    ) -> GalleryResult<ImageRecord> {
        let options = UploadOptions::for_folder(format!("{}/{category}", self.folder_prefix));
        let uploaded = self.media_gateway.upload(bytes, &options).await?;

        let record = ImageRecord {
            id: new_record_id(),
            media_id: uploaded.media_id,
            url: uploaded.url,
            category,
            title,
            description,
            uploaded_at: Utc::now(),
        };

        let pushed = record.clone();
        if let Err(e) = self
            .record_store
            .update(move |document| document.images.push(pushed))
            .await
        {
            error!(media_id = %record.media_id, "Image stored remotely but not recorded: {e}");
            return Err(e.into());
        }

        info!(id = %record.id, media_id = %record.media_id, "Image uploaded");
        Ok(record)
    }
}

/// Checks the declared type, extension and size of an upload
fn validate_upload(upload: &StagedUpload) -> GalleryResult<()> {
    let content_type = upload
        .content_type()
        .ok_or_else(|| GalleryError::Validation("Missing image content type".to_string()))?;

    let mime: Mime = content_type
        .parse()
        .map_err(|_| GalleryError::Validation(format!("Invalid content type: {content_type}")))?;

    let subtype = mime.subtype().as_str().to_ascii_lowercase();
    if mime.type_() != mime::IMAGE || !ALLOWED_IMAGE_SUBTYPES.contains(&subtype.as_str()) {
        return Err(GalleryError::Validation(
            "Only JPEG, PNG and WebP images are allowed".to_string(),
        ));
    }

    if let Some(extension) = upload
        .file_name()
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
    {
        if !ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
            return Err(GalleryError::Validation(format!(
                "File extension .{extension} is not allowed"
            )));
        }
    }

    if upload.is_empty() {
        return Err(GalleryError::Validation("Image is empty".to_string()));
    }

    if upload.len() > MAX_UPLOAD_BYTES {
        return Err(GalleryError::Validation(
            "Image exceeds the 5 MiB limit".to_string(),
        ));
    }

    Ok(())
}

/// Resolves the requested category, defaulting to `tattoo`
fn resolve_category(requested: Option<&str>) -> GalleryResult<Category> {
    match requested.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(Category::default()),
        Some(value) => Category::from_str(value)
            .map_err(|_| GalleryError::Validation(format!("Unknown category: {value}"))),
    }
}
