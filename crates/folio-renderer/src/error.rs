//! Compilation errors.

/// Maximum length of the fragment kept in a [`CompileError`].
const MAX_FRAGMENT_CHARS: usize = 80;

/// A document body that could not be compiled.
///
/// Positions are 1-based; `column` counts characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}: {fragment}")]
pub struct CompileError {
    /// Line of the offending fragment.
    pub line: usize,
    /// Column of the offending fragment.
    pub column: usize,
    /// Source text at the failure location.
    pub fragment: String,
    /// What went wrong.
    pub message: String,
}

impl CompileError {
    /// Create an error for the fragment starting at byte `offset` of `source`.
    pub(crate) fn at(
        source: &str,
        offset: usize,
        fragment: &str,
        message: impl Into<String>,
    ) -> Self {
        let before = source.get(..offset).unwrap_or(source);
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
            fragment: fragment.chars().take(MAX_FRAGMENT_CHARS).collect(),
            message: message.into(),
        }
    }
}
