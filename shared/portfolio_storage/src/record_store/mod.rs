//! File-backed record store
//!
//! The store keeps one JSON document on disk and rewrites it wholesale on every
//! mutation. Writes go to a sibling temporary file which is then renamed over the
//! document, so readers never observe a half-written file.
//!
//! Mutations made through [`RecordStore::update`] and [`RecordStore::try_update`] are
//! serialized within the process. Separate processes writing the same file are not
//! coordinated.

mod error;

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use error::{RecordStoreError, RecordStoreResult};

use crate::models::{AdminCredential, StoreDocument};

/// Storage client for the JSON store document
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Creates a store backed by the document at `path`
    ///
    /// Nothing is touched on disk until the store is initialized or written.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing document exists
    ///
    /// # Errors
    ///
    /// Returns `RecordStoreError::Io` if the file system cannot be queried
    pub async fn exists(&self) -> RecordStoreResult<bool> {
        Ok(tokio::fs::try_exists(&self.path).await?)
    }

    /// Creates the document with empty collections if it does not exist yet
    ///
    /// Returns `true` when a new document was written and `false` when an existing
    /// document was found, in which case `admin` is discarded.
    ///
    /// # Errors
    ///
    /// Returns `RecordStoreError::Io` if the document or its parent directory
    /// cannot be created
    pub async fn initialize(&self, admin: AdminCredential) -> RecordStoreResult<bool> {
        let _guard = self.write_lock.lock().await;

        if self.exists().await? {
            info!(path = %self.path.display(), "Existing record store found");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.save(&StoreDocument::new(admin)).await?;
        info!(path = %self.path.display(), "Record store created");
        Ok(true)
    }

    /// Reads and parses the whole document
    ///
    /// Collections missing from older documents are returned empty.
    ///
    /// # Errors
    ///
    /// - `RecordStoreError::NotInitialized` - the document does not exist
    /// - `RecordStoreError::Corrupt` - the document is not a valid store document
    /// - `RecordStoreError::Io` - the document cannot be read
    pub async fn load(&self) -> RecordStoreResult<StoreDocument> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RecordStoreError::NotInitialized(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Serializes the document and replaces the backing file with it
    ///
    /// This does not take the write lock, prefer [`Self::update`] for mutations.
    ///
    /// # Errors
    ///
    /// Returns `RecordStoreError::Io` if the document cannot be written. The previous
    /// document is left in place in that case.
    pub async fn save(&self, document: &StoreDocument) -> RecordStoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let staging_path = self.staging_path();

        if let Err(e) = tokio::fs::write(&staging_path, &bytes).await {
            warn!(error = %e, "Failed to write staged record store document");
            remove_staging_file(&staging_path).await;
            return Err(e.into());
        }

        if let Err(e) = tokio::fs::rename(&staging_path, &self.path).await {
            warn!(error = %e, "Failed to replace record store document");
            remove_staging_file(&staging_path).await;
            return Err(e.into());
        }

        debug!(
            images = document.images.len(),
            testimonials = document.testimonials.len(),
            "Record store saved"
        );
        Ok(())
    }

    /// Loads the document, applies `mutate` and saves the result
    ///
    /// # Errors
    ///
    /// Returns any `load` or `save` error. When saving fails the mutation is lost.
    pub async fn update<F, R>(&self, mutate: F) -> RecordStoreResult<R>
    where
        F: FnOnce(&mut StoreDocument) -> R,
    {
        self.try_update(|document| Ok::<_, RecordStoreError>(mutate(document)))
            .await
    }

    /// Like [`Self::update`], but `mutate` may refuse the change
    ///
    /// The document is only saved when `mutate` returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the error of `mutate`, or any `load`/`save` error converted into `E`
    pub async fn try_update<F, R, E>(&self, mutate: F) -> Result<R, E>
    where
        F: FnOnce(&mut StoreDocument) -> Result<R, E>,
        E: From<RecordStoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let result = mutate(&mut document)?;
        self.save(&document).await?;

        Ok(result)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

async fn remove_staging_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(error = %e, path = %path.display(), "Failed to remove staged document");
        }
    }
}
