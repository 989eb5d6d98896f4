//! Media host gateway
//!
//! Image binaries live at a third-party media host. The rest of the backend only
//! sees the [`MediaGateway`] trait: upload bytes with a transform policy and get an
//! opaque handle back, or delete an asset by that handle.

mod cloudinary;
mod error;

use async_trait::async_trait;

pub use cloudinary::{CloudinaryClient, CloudinaryConfig};
pub use error::{MediaError, MediaResult};

/// Largest width or height kept by the media host, larger images are downscaled
pub const MAX_DIMENSION: u32 = 1200;
/// Quality normalization applied by the media host
pub const QUALITY: &str = "auto:good";
/// Format every stored asset is converted to
pub const OUTPUT_FORMAT: &str = "jpg";

/// Transform policy for a single upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Remote folder the asset is stored under
    pub target_folder: String,
    /// Bounding box the asset is downscaled to
    pub max_dimension: u32,
    /// Output format
    pub format: &'static str,
}

impl UploadOptions {
    /// Options with the fixed transform policy for the given folder
    #[must_use]
    pub fn for_folder(target_folder: impl Into<String>) -> Self {
        Self {
            target_folder: target_folder.into(),
            max_dimension: MAX_DIMENSION,
            format: OUTPUT_FORMAT,
        }
    }
}

/// Asset stored at the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Opaque handle used to delete the asset later
    pub media_id: String,
    /// Public URL of the asset
    pub url: String,
}

/// Operations the backend needs from the media host
#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Stores `bytes` at the media host
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UploadRejected` if the media host refuses the asset or
    /// cannot be reached
    async fn upload(&self, bytes: Vec<u8>, options: &UploadOptions) -> MediaResult<UploadedMedia>;

    /// Deletes the asset identified by `media_id`
    ///
    /// # Errors
    ///
    /// Returns `MediaError::RemoteDeleteFailed` if the asset could not be deleted
    async fn delete(&self, media_id: &str) -> MediaResult<()>;
}

/// Gateway used when the media host credentials are not configured
///
/// Listing and deleting gallery records keeps working, uploads are refused.
#[derive(Debug, Default)]
pub struct DisabledMediaGateway;

#[async_trait]
impl MediaGateway for DisabledMediaGateway {
    async fn upload(&self, _bytes: Vec<u8>, _options: &UploadOptions) -> MediaResult<UploadedMedia> {
        Err(MediaError::UploadRejected(
            "media host is not configured".to_string(),
        ))
    }

    async fn delete(&self, media_id: &str) -> MediaResult<()> {
        Err(MediaError::RemoteDeleteFailed(format!(
            "media host is not configured, {media_id} was left in place"
        )))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{MediaError, MediaGateway, MediaResult, UploadOptions, UploadedMedia};

    /// Upload recorded by the mock gateway
    #[derive(Debug, Clone)]
    pub struct RecordedUpload {
        /// Size of the uploaded payload
        pub len: usize,
        /// Options the upload was made with
        pub options: UploadOptions,
    }

    /// In-memory gateway that records calls and can be told to fail
    #[derive(Debug, Default)]
    pub struct MockMediaGateway {
        fail_uploads: bool,
        fail_deletes: bool,
        uploads: Mutex<Vec<RecordedUpload>>,
        deletes: Mutex<Vec<String>>,
    }

    impl MockMediaGateway {
        /// Gateway that accepts every call
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Gateway whose calls fail as requested
        #[must_use]
        pub fn failing(fail_uploads: bool, fail_deletes: bool) -> Self {
            Self {
                fail_uploads,
                fail_deletes,
                ..Self::default()
            }
        }

        /// Uploads received so far
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn uploads(&self) -> Vec<RecordedUpload> {
            self.uploads.lock().unwrap().clone()
        }

        /// Media ids whose deletion was requested so far
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn deletes(&self) -> Vec<String> {
            self.deletes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaGateway for MockMediaGateway {
        async fn upload(
            &self,
            bytes: Vec<u8>,
            options: &UploadOptions,
        ) -> MediaResult<UploadedMedia> {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(RecordedUpload {
                len: bytes.len(),
                options: options.clone(),
            });

            if self.fail_uploads {
                return Err(MediaError::UploadRejected("mock rejection".to_string()));
            }

            let media_id = format!("{}/asset-{}", options.target_folder, uploads.len());
            Ok(UploadedMedia {
                url: format!("https://media.test/{media_id}.{}", options.format),
                media_id,
            })
        }

        async fn delete(&self, media_id: &str) -> MediaResult<()> {
            self.deletes.lock().unwrap().push(media_id.to_string());

            if self.fail_deletes {
                return Err(MediaError::RemoteDeleteFailed("mock failure".to_string()));
            }
            Ok(())
        }
    }
}
