//! Relative document link resolution.

use crate::util::strip_order_prefix;

const DOCUMENT_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// Resolve a markdown link URL relative to a section path.
///
/// Transforms links to markdown files into site routes:
/// - `./sibling.md` → `/base/path/sibling`
/// - `../other.mdx` → `/base/other`
/// - `../01-intro/overview.md#setup` → `/base/intro/overview#setup`
///
/// Numeric ordering prefixes are stripped from every segment so links written
/// against the on-disk layout match the slug-based routes. External links,
/// fragment-only links and non-markdown links are returned unchanged.
pub(crate) fn resolve_link(url: &str, base_path: &str) -> String {
    // Skip external links, fragments, and non-local URLs
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    // Split URL into path and fragment
    let (path_part, fragment) = match url.find('#') {
        Some(hash_pos) => (&url[..hash_pos], &url[hash_pos..]),
        None => (url, ""),
    };

    let Some(without_ext) = strip_document_extension(path_part) else {
        return url.to_owned();
    };

    let resolved = if let Some(absolute) = without_ext.strip_prefix('/') {
        resolve_relative_path(absolute, "")
    } else {
        resolve_relative_path(without_ext, base_path)
    };

    format!("/{resolved}{fragment}")
}

fn strip_document_extension(path: &str) -> Option<&str> {
    DOCUMENT_EXTENSIONS.iter().find_map(|ext| {
        let split = path.len().checked_sub(ext.len())?;
        let (stem, tail) = (path.get(..split)?, path.get(split..)?);
        (tail.eq_ignore_ascii_case(ext) && !stem.is_empty()).then_some(stem)
    })
}

/// Resolve a relative path against a base path.
///
/// Handles `.` (current), `..` (parent), and plain relative paths.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    // The base is treated as a directory
    let mut segments: Vec<&str> = base
        .split('/')
        .filter(|s| !s.is_empty())
        .map(strip_order_prefix)
        .collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                // Ignore if already at root to prevent traversal
                segments.pop();
            }
            _ => segments.push(strip_order_prefix(component)),
        }
    }

    segments.join("/")
}
