//! Section metadata files (`meta.yaml`).

use serde::Deserialize;

/// Fields read from a section metadata file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct SectionMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Parse section metadata from YAML content.
///
/// Empty content yields default metadata. Unknown keys are ignored.
pub(crate) fn parse_section_meta(content: &str) -> Result<SectionMeta, serde_yaml::Error> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(SectionMeta::default());
    }
    let meta: SectionMeta = serde_yaml::from_str(trimmed)?;
    Ok(SectionMeta {
        title: meta.title.filter(|t| !t.trim().is_empty()),
        description: meta.description,
    })
}
