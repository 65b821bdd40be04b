//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.source_dir`
//! - `content.meta_filename`
//! - `build.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override unpublished document visibility.
    pub include_unpublished: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

const DEFAULT_SOURCE_DIR: &str = "content";
const DEFAULT_OUTPUT_DIR: &str = ".folio/build";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content discovery settings (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Site snapshot settings.
    pub site: SiteSection,
    /// Search settings.
    pub search: SearchConfig,
    /// Static build settings (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    meta_filename: String,
    keep_empty_sections: bool,
}

impl Default for ContentConfigRaw {
    fn default() -> Self {
        Self {
            source_dir: None,
            meta_filename: "meta.yaml".to_owned(),
            keep_empty_sections: false,
        }
    }
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Root directory holding the `NN-<slug>` section directories.
    pub source_dir: PathBuf,
    /// Section metadata file name.
    pub meta_filename: String,
    /// Keep sections with no documents beneath them.
    pub keep_empty_sections: bool,
}

/// Site snapshot configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Keep documents marked `published: false`.
    pub include_unpublished: bool,
}

/// Search configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Cap on the number of hits (no cap when absent).
    pub max_results: Option<usize>,
}

/// Raw build configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory the static build writes to.
    pub output_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output_dir`").
        field: String,
        /// Error message (e.g., "${`OUT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment variable is missing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(include_unpublished) = settings.include_unpublished {
            self.site.include_unpublished = include_unpublished;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let content = ContentConfigRaw::default();
        Self {
            content_resolved: ContentConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                meta_filename: content.meta_filename.clone(),
                keep_empty_sections: content.keep_empty_sections,
            },
            content,
            site: SiteSection::default(),
            search: SearchConfig::default(),
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig {
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty `content.meta_filename`
    /// or `search.max_results = 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.content_resolved.meta_filename, "content.meta_filename")?;
        if self.search.max_results == Some(0) {
            return Err(ConfigError::Validation(
                "search.max_results must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source_dir) = self.content.source_dir {
            self.content.source_dir =
                Some(expand::expand_env(source_dir, "content.source_dir")?);
        }
        self.content.meta_filename =
            expand::expand_env(&self.content.meta_filename, "content.meta_filename")?;
        if let Some(ref output_dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(output_dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            meta_filename: self.content.meta_filename.clone(),
            keep_empty_sections: self.content.keep_empty_sections,
        };
        self.build_resolved = BuildConfig {
            output_dir: resolve(self.build.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/test/content"));
        assert_eq!(config.content_resolved.meta_filename, "meta.yaml");
        assert!(!config.content_resolved.keep_empty_sections);
        assert!(!config.site.include_unpublished);
        assert_eq!(config.search.max_results, None);
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/test/.folio/build"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("");
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/project/content"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[content]
source_dir = "docs/content"
meta_filename = "_section.yaml"
keep_empty_sections = true

[site]
include_unpublished = true

[search]
max_results = 20

[build]
output_dir = "dist"
"#,
        );
        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/project/docs/content")
        );
        assert_eq!(config.content_resolved.meta_filename, "_section.yaml");
        assert!(config.content_resolved.keep_empty_sections);
        assert!(config.site.include_unpublished);
        assert_eq!(config.search.max_results, Some(20));
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/project/dist"));
    }

    #[test]
    fn test_validate_empty_meta_filename() {
        let config = parse("[content]\nmeta_filename = \"\"\n");
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: content.meta_filename cannot be empty"
        );
    }

    #[test]
    fn test_validate_max_results_zero() {
        let config = parse("[search]\nmax_results = 0\n");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            source_dir: Some(PathBuf::from("/other/content")),
            output_dir: Some(PathBuf::from("/tmp/out")),
            include_unpublished: Some(true),
        });
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/other/content"));
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.site.include_unpublished);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/test/content"));
        assert!(!config.site.include_unpublished);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("FOLIO_TEST_CONFIG_OUT", "/var/www");
        }
        let mut config: Config =
            toml::from_str("[build]\noutput_dir = \"${FOLIO_TEST_CONFIG_OUT}/docs\"\n").unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/var/www/docs"));
        unsafe {
            std::env::remove_var("FOLIO_TEST_CONFIG_OUT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let mut config: Config =
            toml::from_str("[content]\nsource_dir = \"${FOLIO_TEST_CONFIG_MISSING}\"\n").unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "content.source_dir"));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content]\nsource_dir = \"src/content\"\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.content_resolved.source_dir, dir.path().join("src/content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content\n").unwrap();
        assert!(matches!(
            Config::load(Some(path.as_path()), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
