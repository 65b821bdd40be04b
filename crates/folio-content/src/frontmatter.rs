//! Front matter parsing.
//!
//! A front matter block is YAML between a `---` line at the very start of the
//! file and the next `---` line:
//!
//! ```text
//! ---
//! title: Getting Started
//! tags: [setup, basics]
//! order: 1
//! ---
//! # Body starts here
//! ```
//!
//! [`parse_front_matter`] returns the raw mapping (unknown keys included) and
//! the body. [`DocFrontMatter::from_metadata`] converts the mapping into the
//! typed record, ignoring keys it does not know.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Error returned for a front matter block that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// The block is not valid YAML.
    #[error("invalid YAML in front matter: {0}")]
    Yaml(#[source] serde_yaml::Error),
    /// The block parsed, but its top level is not a mapping.
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
    /// A known key has a value of the wrong shape.
    #[error("invalid front matter: {0}")]
    Field(#[source] serde_yaml::Error),
}

/// A file split into metadata and body.
#[derive(Debug, PartialEq)]
pub struct ParsedFile<'a> {
    /// Raw metadata mapping; empty when the file has no front matter.
    pub metadata: Mapping,
    /// Everything after the closing delimiter.
    pub body: &'a str,
}

/// Split raw file text into front matter metadata and body.
///
/// Files without an opening `---` line, or with an opening line but no
/// closing one, have no front matter: the metadata is empty and the body is
/// the whole text. A leading byte order mark is ignored.
///
/// # Errors
///
/// Returns [`FrontMatterError`] if the block is not valid YAML or is not a
/// mapping.
///
/// # Examples
///
/// ```
/// use folio_content::parse_front_matter;
///
/// let parsed = parse_front_matter("---\ntitle: Hello\n---\nBody").unwrap();
/// assert_eq!(parsed.metadata.get("title").and_then(|v| v.as_str()), Some("Hello"));
/// assert_eq!(parsed.body, "Body");
///
/// let plain = parse_front_matter("# Just markdown").unwrap();
/// assert!(plain.metadata.is_empty());
/// assert_eq!(plain.body, "# Just markdown");
/// ```
pub fn parse_front_matter(text: &str) -> Result<ParsedFile<'_>, FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let no_front_matter = ParsedFile {
        metadata: Mapping::new(),
        body: text,
    };

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(no_front_matter);
    };
    if trim_line_ending(first) != DELIMITER {
        return Ok(no_front_matter);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if trim_line_ending(line) == DELIMITER {
            let metadata = parse_block(&text[block_start..offset])?;
            return Ok(ParsedFile {
                metadata,
                body: &text[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    // Unterminated block: treat the file as plain markdown.
    Ok(no_front_matter)
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn parse_block(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml).map_err(FrontMatterError::Yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

/// Typed document metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocFrontMatter {
    /// Declared title, or the slug with hyphens replaced by spaces. Never empty.
    pub title: String,
    /// Short summary shown in listings and search results.
    pub description: Option<String>,
    /// ISO date string, informational only.
    pub date: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Tags in declaration order.
    pub tags: Vec<String>,
    /// Sort key among siblings (ascending).
    pub order: i64,
    /// Whether the document is listed and searchable.
    pub published: bool,
}

/// Known keys as they appear in the YAML block.
#[derive(Deserialize)]
struct RawFrontMatter {
    #[serde(default, deserialize_with = "optional_scalar")]
    title: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    date: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    author: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    tags: Vec<String>,
    #[serde(default)]
    order: Option<i64>,
    #[serde(default)]
    published: Option<bool>,
}

impl DocFrontMatter {
    /// Default metadata for a document with the given slug.
    pub fn for_slug(slug: &str) -> Self {
        Self {
            title: default_title(slug),
            description: None,
            date: None,
            author: None,
            tags: Vec::new(),
            order: 0,
            published: true,
        }
    }

    /// Convert a raw metadata mapping into typed front matter.
    ///
    /// Unknown keys are ignored. A missing or blank `title` falls back to the
    /// slug with hyphens replaced by spaces.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError::Field`] if a known key has the wrong shape,
    /// e.g. `tags` is not a list of scalars or `order` is not an integer.
    pub fn from_metadata(metadata: &Mapping, slug: &str) -> Result<Self, FrontMatterError> {
        if metadata.is_empty() {
            return Ok(Self::for_slug(slug));
        }

        let raw: RawFrontMatter = serde_yaml::from_value(Value::Mapping(metadata.clone()))
            .map_err(FrontMatterError::Field)?;

        Ok(Self {
            title: raw
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| default_title(slug)),
            description: raw.description,
            date: raw.date,
            author: raw.author,
            tags: raw.tags,
            order: raw.order.unwrap_or(0),
            published: raw.published.unwrap_or(true),
        })
    }
}

/// Title used when front matter declares none.
fn default_title(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Render a YAML scalar as a string. Returns `None` for sequences and mappings.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a single value")),
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .into_iter()
            .map(|item| {
                scalar_to_string(item).ok_or_else(|| D::Error::custom("tags must be a list of strings"))
            })
            .collect(),
        Some(_) => Err(D::Error::custom("tags must be a list of strings")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn meta(yaml: &str) -> Mapping {
        parse_front_matter(yaml).unwrap().metadata
    }

    #[test]
    fn test_parse_simple_block() {
        let parsed = parse_front_matter("---\ntitle: Intro\norder: 2\n---\n# Heading\n").unwrap();
        assert_eq!(
            parsed.metadata.get("title").and_then(Value::as_str),
            Some("Intro")
        );
        assert_eq!(parsed.metadata.get("order").and_then(Value::as_i64), Some(2));
        assert_eq!(parsed.body, "# Heading\n");
    }

    #[test]
    fn test_parse_without_front_matter() {
        let parsed = parse_front_matter("# Title\n\nText").unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "# Title\n\nText");
    }

    #[test]
    fn test_parse_delimiter_not_on_first_line() {
        let text = "\n---\ntitle: x\n---\nbody";
        let parsed = parse_front_matter(text).unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn test_parse_unterminated_block_is_body() {
        let text = "---\ntitle: x\nno closing";
        let parsed = parse_front_matter(text).unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn test_parse_empty_block() {
        let parsed = parse_front_matter("---\n---\nbody").unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let parsed = parse_front_matter("---\r\ntitle: Win\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(
            parsed.metadata.get("title").and_then(Value::as_str),
            Some("Win")
        );
        assert_eq!(parsed.body, "body\r\n");
    }

    #[test]
    fn test_parse_strips_bom() {
        let parsed = parse_front_matter("\u{feff}---\ntitle: Bom\n---\nbody").unwrap();
        assert_eq!(
            parsed.metadata.get("title").and_then(Value::as_str),
            Some("Bom")
        );
    }

    #[test]
    fn test_parse_delimiter_must_be_exact() {
        let text = "----\ntitle: x\n----\nbody";
        let parsed = parse_front_matter(text).unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn test_parse_body_may_contain_rules() {
        let parsed = parse_front_matter("---\ntitle: x\n---\nabove\n\n---\n\nbelow").unwrap();
        assert_eq!(parsed.body, "above\n\n---\n\nbelow");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_front_matter("---\ntitle: [unclosed\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn test_parse_scalar_block_is_not_a_mapping() {
        let result = parse_front_matter("---\njust text\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::NotAMapping)));
    }

    #[test]
    fn test_unknown_keys_preserved_in_mapping() {
        let metadata = meta("---\ntitle: x\nlayout: wide\n---\n");
        assert_eq!(
            metadata.get("layout").and_then(Value::as_str),
            Some("wide")
        );
        let typed = DocFrontMatter::from_metadata(&metadata, "x").unwrap();
        assert_eq!(typed.title, "x");
    }

    #[test]
    fn test_typed_all_fields() {
        let metadata = meta(
            "---\ntitle: Testing Guide\ndescription: How we test\ndate: 2024-03-01\nauthor: Sam\ntags: [rust, testing, ci]\norder: 3\npublished: false\n---\n",
        );
        let typed = DocFrontMatter::from_metadata(&metadata, "testing").unwrap();
        assert_eq!(
            typed,
            DocFrontMatter {
                title: "Testing Guide".to_owned(),
                description: Some("How we test".to_owned()),
                date: Some("2024-03-01".to_owned()),
                author: Some("Sam".to_owned()),
                tags: vec!["rust".to_owned(), "testing".to_owned(), "ci".to_owned()],
                order: 3,
                published: false,
            }
        );
    }

    #[test]
    fn test_typed_defaults() {
        let typed = DocFrontMatter::from_metadata(&Mapping::new(), "getting-started").unwrap();
        assert_eq!(typed.title, "getting started");
        assert_eq!(typed.order, 0);
        assert!(typed.published);
        assert!(typed.tags.is_empty());
        assert!(typed.description.is_none());
    }

    #[test]
    fn test_typed_title_preserved_exactly() {
        let metadata = meta("---\ntitle: \"  CamelCase & Symbols!  \"\n---\n");
        let typed = DocFrontMatter::from_metadata(&metadata, "x").unwrap();
        assert_eq!(typed.title, "  CamelCase & Symbols!  ");
    }

    #[test]
    fn test_typed_blank_title_falls_back() {
        let metadata = meta("---\ntitle: \"\"\n---\n");
        let typed = DocFrontMatter::from_metadata(&metadata, "my-doc").unwrap();
        assert_eq!(typed.title, "my doc");
    }

    #[test]
    fn test_typed_tags_block_sequence_keeps_order() {
        let metadata = meta("---\ntags:\n  - zeta\n  - alpha\n  - 2024\n---\n");
        let typed = DocFrontMatter::from_metadata(&metadata, "x").unwrap();
        assert_eq!(typed.tags, vec!["zeta", "alpha", "2024"]);
    }

    #[test]
    fn test_typed_tags_not_a_list_is_error() {
        let metadata = meta("---\ntags: rust\n---\n");
        let result = DocFrontMatter::from_metadata(&metadata, "x");
        assert!(matches!(result, Err(FrontMatterError::Field(_))));
    }

    #[test]
    fn test_typed_tags_nested_list_is_error() {
        let metadata = meta("---\ntags: [[a, b]]\n---\n");
        assert!(DocFrontMatter::from_metadata(&metadata, "x").is_err());
    }

    #[test]
    fn test_typed_published_only_false_when_explicit() {
        let metadata = meta("---\npublished: true\n---\n");
        assert!(DocFrontMatter::from_metadata(&metadata, "x").unwrap().published);
        let metadata = meta("---\ntitle: x\n---\n");
        assert!(DocFrontMatter::from_metadata(&metadata, "x").unwrap().published);
    }

    #[test]
    fn test_typed_numeric_title_is_stringified() {
        let metadata = meta("---\ntitle: 2024\n---\n");
        let typed = DocFrontMatter::from_metadata(&metadata, "x").unwrap();
        assert_eq!(typed.title, "2024");
    }
}
