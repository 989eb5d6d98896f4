//! Bulk import of local image folders into the gallery
//!
//! Every image file of a category folder is sent to the media host and recorded,
//! one at a time. The store document is saved after each image, so an
//! interrupted run keeps what it already imported.

mod error;

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use portfolio_storage::Category;
use regex::Regex;
use tracing::{info, instrument, warn};

pub use error::BulkImportError;

use crate::gallery::GalleryService;

static IMAGE_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif|heic)$").expect("Invalid image file regex")
});

static WORD_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("Invalid word regex"));

/// Local folder holding the images of one category
#[derive(Debug, Clone)]
pub struct ImportFolder {
    /// Category given to every image of the folder
    pub category: Category,
    /// Folder path
    pub path: PathBuf,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Images uploaded and recorded
    pub uploaded: usize,
    /// Images that could not be read, uploaded or recorded
    pub failed: usize,
    /// Folders without any image
    pub skipped_folders: usize,
}

/// Whether a file name looks like an image the importer picks up
#[must_use]
pub fn is_image_file(file_name: &str) -> bool {
    IMAGE_FILE_REGEX.is_match(file_name)
}

/// Turns a file name into a gallery title
///
/// The extension is dropped, `-` and `_` become spaces and every word is
/// capitalized: `tattoo-dragon_red.jpg` gives `Tattoo Dragon Red`.
#[must_use]
pub fn format_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |stem| stem.to_string_lossy().into_owned());
    let spaced = stem.replace(['-', '_'], " ");

    WORD_START_REGEX
        .replace_all(&spaced, |captures: &regex::Captures<'_>| captures[0].to_uppercase())
        .into_owned()
}

/// Uploads local image folders through the gallery service
pub struct BulkImporter {
    gallery: Arc<GalleryService>,
    delay: Duration,
}

impl BulkImporter {
    /// Creates an importer pausing `delay` between uploads
    #[must_use]
    pub const fn new(gallery: Arc<GalleryService>, delay: Duration) -> Self {
        Self { gallery, delay }
    }

    /// Imports every folder in order
    ///
    /// Failed images are counted and skipped.
    ///
    /// # Errors
    ///
    /// - `BulkImportError::MissingFolders` - a folder does not exist, checked before any upload
    /// - `BulkImportError::Gallery` - the store document cannot be read
    /// - `BulkImportError::ReadFolder` - a folder cannot be listed
    #[instrument(skip_all)]
    pub async fn run(&self, folders: &[ImportFolder]) -> Result<ImportSummary, BulkImportError> {
        let mut missing = Vec::new();
        for folder in folders {
            if !tokio::fs::try_exists(&folder.path).await.unwrap_or(false) {
                missing.push(folder.path.clone());
            }
        }
        if !missing.is_empty() {
            return Err(BulkImportError::MissingFolders(missing));
        }

        let existing = self.gallery.list_images(None).await?.len();
        info!("{existing} images already in the gallery");

        let mut summary = ImportSummary::default();
        for folder in folders {
            let files = image_files(&folder.path).await?;
            if files.is_empty() {
                warn!(folder = %folder.path.display(), "No images found, skipping folder");
                summary.skipped_folders += 1;
                continue;
            }

            info!(category = %folder.category, "{} images to upload", files.len());
            for (index, file) in files.iter().enumerate() {
                info!("[{}/{}] Uploading {}", index + 1, files.len(), file.display());
                if self.import_file(file, folder.category).await {
                    summary.uploaded += 1;
                } else {
                    summary.failed += 1;
                }

                if index + 1 < files.len() {
                    tokio::time::sleep(self.delay).await;
                }
            }
        }

        Ok(summary)
    }

    async fn import_file(&self, path: &Path, category: Category) -> bool {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), "Failed to read image: {e}");
                return false;
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self
            .gallery
            .import_image(bytes, category, format_title(&file_name))
            .await
        {
            Ok(record) => {
                info!(media_id = %record.media_id, "Uploaded");
                true
            }
            Err(e) => {
                warn!(file = %path.display(), "Failed to upload image: {e}");
                false
            }
        }
    }
}

/// Image files of a folder, sorted by name
async fn image_files(folder: &Path) -> Result<Vec<PathBuf>, BulkImportError> {
    let read_error = |source| BulkImportError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(read_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let is_file = entry.file_type().await.map_err(read_error)?.is_file();
        if is_file && is_image_file(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
