//! Heading anchor generation.

use std::collections::{HashMap, HashSet};

/// Anchor used when a heading's text has no alphanumeric characters.
const FALLBACK_ANCHOR: &str = "section";

/// Convert heading text to an anchor.
///
/// Lowercases the text and collapses every run of non-alphanumeric
/// characters into a single hyphen. Trailing hyphens are trimmed.
///
/// ```
/// use folio_renderer::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// assert_eq!(slugify("C++ & Rust"), "c-rust");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }

    let trimmed_len = result.trim_end_matches('-').len();
    result.truncate(trimmed_len);
    result
}

/// Assigns unique anchors within one document.
///
/// The first heading with a given base anchor keeps it; later ones get `-1`,
/// `-2`, ... skipping any anchor already taken, including ones produced
/// directly by heading text such as "Overview 1".
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl AnchorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fresh anchor for heading text.
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            FALLBACK_ANCHOR.clone_into(&mut base);
        }

        if self.used.insert(base.clone()) {
            return base;
        }

        let suffix = self.next_suffix.entry(base.clone()).or_insert(1);
        loop {
            let candidate = format!("{base}-{suffix}");
            *suffix += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
