use std::path::PathBuf;

use thiserror::Error;

use crate::gallery::GalleryError;

/// Errors that stop a bulk import
#[derive(Debug, Error)]
pub enum BulkImportError {
    /// Source folders that do not exist, nothing was uploaded
    #[error("Missing image folders: {}", display_paths(.0))]
    MissingFolders(Vec<PathBuf>),

    /// A source folder could not be listed
    #[error("Failed to read {path}: {source}")]
    ReadFolder {
        /// Folder being listed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The store document could not be read
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
