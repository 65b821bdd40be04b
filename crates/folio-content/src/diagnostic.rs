//! Build diagnostics for files excluded from the content tree.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ContentError;

/// Category of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File disappeared between listing and reading.
    NotFound,
    /// File could not become a document (bad front matter, empty slug, duplicate slug).
    InvalidDocument,
    /// File or directory could not be read.
    Io,
}

/// A file or directory left out of the tree, with the reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Path of the offending file or directory.
    pub path: PathBuf,
    /// Error category.
    pub kind: DiagnosticKind,
    /// Human-readable reason.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic for an invalid document.
    pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: DiagnosticKind::InvalidDocument,
            message: message.into(),
        }
    }
}

impl From<&ContentError> for Diagnostic {
    fn from(err: &ContentError) -> Self {
        let (kind, message) = match err {
            ContentError::NotFound(_) => (DiagnosticKind::NotFound, "file not found".to_owned()),
            ContentError::InvalidDocument { reason, .. } => {
                (DiagnosticKind::InvalidDocument, reason.clone())
            }
            ContentError::Io { source, .. } => (DiagnosticKind::Io, source.to_string()),
        };
        Self {
            path: err.path().to_path_buf(),
            kind,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_from_invalid_document() {
        let err = ContentError::invalid("docs/bad.md", "tags must be a list of strings");
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.kind, DiagnosticKind::InvalidDocument);
        assert_eq!(diagnostic.path, Path::new("docs/bad.md"));
        assert_eq!(
            diagnostic.to_string(),
            "docs/bad.md: tags must be a list of strings"
        );
    }
}
