//! Directory listing for tree building.
//!
//! The scanner only classifies directory entries (documents, child
//! directories, the metadata file). Reading documents is left to
//! [`DocumentLoader`](crate::DocumentLoader).

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::is_markdown_file;
use crate::error::ContentError;

/// Classified entries of one directory, each list sorted by file name.
#[derive(Debug, Default)]
pub(crate) struct DirListing {
    /// Markdown files directly inside the directory.
    pub documents: Vec<PathBuf>,
    /// Child directories as `(name, path)`.
    pub directories: Vec<(String, PathBuf)>,
    /// Section metadata file, if present.
    pub meta_path: Option<PathBuf>,
}

/// Lists directories, skipping hidden entries and partials.
pub(crate) struct Scanner {
    meta_filename: String,
}

impl Scanner {
    /// Create a scanner that recognizes `meta_filename` as section metadata.
    pub fn new(meta_filename: impl Into<String>) -> Self {
        Self {
            meta_filename: meta_filename.into(),
        }
    }

    /// List one directory.
    ///
    /// Names starting with `.` or `_` are skipped. Symbolic links to files
    /// are listed as documents; symbolic links to directories are not
    /// followed. Dangling links are listed so the loader reports them.
    pub fn list(&self, dir: &Path) -> Result<DirListing, ContentError> {
        let entries = fs::read_dir(dir).map_err(|e| ContentError::from_io(e, dir))?;

        let mut listing = DirListing::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(path = %dir.display(), %error, "Skipping unreadable entry");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if is_skipped_name(&name) {
                continue;
            }

            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                listing.directories.push((name, path));
            } else if name == self.meta_filename {
                listing.meta_path = Some(path);
            } else if is_markdown_file(&path) && resolves_to_file(&path, file_type) {
                listing.documents.push(path);
            }
        }

        listing.documents.sort();
        listing.directories.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listing)
    }
}

/// Hidden files and partials are never part of the tree.
fn is_skipped_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

fn resolves_to_file(path: &Path, file_type: fs::FileType) -> bool {
    if !file_type.is_symlink() {
        return file_type.is_file();
    }
    match fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(_) => true,
    }
}
