//! Temporary files backing in-flight uploads
//!
//! An upload is spooled to a [`NamedTempFile`] owned by [`StagedUpload`]. The file is
//! removed when the value is dropped, whichever way the upload ends.

use std::path::Path;

use axum::extract::multipart::Field;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use super::{GalleryError, GalleryResult, MAX_UPLOAD_BYTES};

/// Uploaded file spooled to disk
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    len: u64,
    content_type: Option<String>,
    file_name: Option<String>,
}

impl StagedUpload {
    /// Spools a multipart field to a temporary file in `temp_dir`
    ///
    /// Reading stops as soon as the field grows past the upload limit; the returned
    /// value then reports a length above the limit and is refused by validation.
    ///
    /// # Errors
    ///
    /// - `GalleryError::Validation` - the multipart stream is malformed
    /// - `GalleryError::Staging` - the temporary file cannot be written
    pub async fn from_field(temp_dir: &Path, mut field: Field<'_>) -> GalleryResult<Self> {
        let content_type = field.content_type().map(ToString::to_string);
        let file_name = field.file_name().map(ToString::to_string);

        let (file, mut writer) = create_temp_file(temp_dir).await?;
        let mut len: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| GalleryError::Validation(e.body_text()))?
        {
            len += chunk.len() as u64;
            if len > MAX_UPLOAD_BYTES {
                break;
            }
            writer
                .write_all(&chunk)
                .await
                .map_err(GalleryError::Staging)?;
        }
        writer.flush().await.map_err(GalleryError::Staging)?;

        Ok(Self {
            file,
            len,
            content_type,
            file_name,
        })
    }

    /// Spools in-memory bytes to a temporary file in `temp_dir`
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Staging` if the temporary file cannot be written
    pub async fn from_bytes(
        temp_dir: &Path,
        bytes: &[u8],
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> GalleryResult<Self> {
        let (file, mut writer) = create_temp_file(temp_dir).await?;
        writer.write_all(bytes).await.map_err(GalleryError::Staging)?;
        writer.flush().await.map_err(GalleryError::Staging)?;

        Ok(Self {
            file,
            len: bytes.len() as u64,
            content_type: content_type.map(ToString::to_string),
            file_name: file_name.map(ToString::to_string),
        })
    }

    /// Number of bytes received
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bytes were received
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Declared MIME type
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Client-side file name
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Location of the temporary file
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the staged bytes back
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Staging` if the temporary file cannot be read
    pub async fn read(&self) -> GalleryResult<Vec<u8>> {
        tokio::fs::read(self.file.path())
            .await
            .map_err(GalleryError::Staging)
    }
}

async fn create_temp_file(temp_dir: &Path) -> GalleryResult<(NamedTempFile, tokio::fs::File)> {
    tokio::fs::create_dir_all(temp_dir)
        .await
        .map_err(GalleryError::Staging)?;

    let file = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(temp_dir)
        .map_err(GalleryError::Staging)?;
    let writer = file
        .as_file()
        .try_clone()
        .map(tokio::fs::File::from_std)
        .map_err(GalleryError::Staging)?;

    Ok((file, writer))
}
