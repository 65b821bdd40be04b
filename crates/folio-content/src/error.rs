//! Error types for content loading.

use std::io;
use std::path::{Path, PathBuf};

/// Error returned when loading content from disk.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The requested file or directory does not exist.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but cannot become a document.
    #[error("Invalid document {}: {reason}", path.display())]
    InvalidDocument {
        /// Offending file.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },
    /// Read failure other than not-found (e.g. permission denied).
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    /// Create an invalid document error.
    pub fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Classify an I/O error for the given path.
    ///
    /// Missing files map to [`ContentError::NotFound`] and undecodable
    /// content to [`ContentError::InvalidDocument`].
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::InvalidData => Self::invalid(path, "content is not valid UTF-8"),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::InvalidDocument { path, .. } | Self::Io { path, .. } => {
                path
            }
        }
    }
}
