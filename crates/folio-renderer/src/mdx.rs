//! MDX checks: component tag balance and ESM statements.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CompileError;

/// JSX component tag: name starts with an uppercase letter. Attribute values
/// may be quoted strings or single-level `{...}` expressions.
static COMPONENT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Z][\w.]*)(?:\s(?:[^>"'{}]|"[^"]*"|'[^']*'|\{[^{}]*\})*)?\s*/?>"#)
        .unwrap()
});

/// Whether a top-level paragraph is an ESM `import`/`export` statement.
pub(crate) fn is_esm(paragraph: &str) -> bool {
    paragraph.starts_with("import ") || paragraph.starts_with("export ")
}

/// Check that every component tag outside code is closed in the right order.
///
/// `code_ranges` are byte ranges of code blocks and code spans; tags inside
/// them are literal text.
pub(crate) fn check_components(
    source: &str,
    code_ranges: &[Range<usize>],
) -> Result<(), CompileError> {
    let mut open: Vec<(&str, usize, &str)> = Vec::new();

    for caps in COMPONENT_TAG_RE.captures_iter(source) {
        let (Some(tag), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if code_ranges.iter().any(|r| r.contains(&tag.start())) {
            continue;
        }

        let name = name.as_str();
        let closing = caps.get(1).is_some_and(|m| !m.is_empty());
        if closing {
            match open.pop() {
                Some((expected, _, _)) if expected == name => {}
                Some((expected, _, _)) => {
                    return Err(CompileError::at(
                        source,
                        tag.start(),
                        tag.as_str(),
                        format!("mismatched closing tag </{name}>, expected </{expected}>"),
                    ));
                }
                None => {
                    return Err(CompileError::at(
                        source,
                        tag.start(),
                        tag.as_str(),
                        format!("unexpected closing tag </{name}>"),
                    ));
                }
            }
        } else if !tag.as_str().ends_with("/>") {
            open.push((name, tag.start(), tag.as_str()));
        }
    }

    match open.last() {
        Some((name, offset, fragment)) => Err(CompileError::at(
            source,
            *offset,
            fragment,
            format!("unclosed component <{name}>"),
        )),
        None => Ok(()),
    }
}
