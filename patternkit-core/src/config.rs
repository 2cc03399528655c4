//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the patternkit.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    /// Root holding one directory per topic
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Root that front-matter `snippets[].file` paths are relative to
    #[serde(default)]
    pub snippets_dir: Option<PathBuf>,

    /// Extension of content files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_extension() -> String {
    String::from("mdx")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

fn default_site_title() -> String {
    String::from("PatternKit")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: String::new(),
        }
    }
}

/// What a listing does when one entry's metadata block is malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole listing with the first malformed entry
    #[default]
    Fail,
    /// Leave the entry out and log a warning
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    String::from("InspiredGitHub")
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            content_dir: default_content_dir(),
            snippets_dir: None,
            extension: default_extension(),
            catalog: CatalogConfig::default(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&contents)?
        };

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load from `path`, or fall back to defaults rooted next to it when the
    /// file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        tracing::debug!("No config at {:?}; using defaults", path);
        Ok(Config {
            config_path: Some(path.to_path_buf()),
            ..Config::default()
        })
    }

    /// Get the content directory, resolved relative to config file
    pub fn content_root(&self) -> PathBuf {
        self.resolve_path(&self.content_dir)
    }

    /// Get the snippets directory, resolved relative to config file
    pub fn snippets_root(&self) -> Option<PathBuf> {
        self.snippets_dir.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.extension, "mdx");
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.catalog.on_malformed, MalformedPolicy::Fail);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(config.snippets_root().is_none());
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patternkit.yml");
        fs::write(
            &path,
            r#"
site:
  title: "Catálogo"
content_dir: "articles"
snippets_dir: "code-examples"
catalog:
  on_malformed: skip
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.site.title, "Catálogo");
        assert_eq!(config.content_root(), dir.path().join("articles"));
        assert_eq!(
            config.snippets_root(),
            Some(dir.path().join("code-examples"))
        );
        assert_eq!(config.catalog.on_malformed, MalformedPolicy::Skip);
        assert_eq!(config.extension, "mdx");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.content_root(), dir.path().join("content"));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patternkit.yml");
        fs::write(&path, "catalog:\n  on_malformed: retry\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
