//! Settings file (`genform.toml`).
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::{Limits, DEFAULT_MAX_DEPTH};

pub const DEFAULT_FILE: &str = "genform.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub schema: SchemaSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSettings {
    /// Deepest section nesting the loader accepts
    pub max_depth: usize,
    /// Reject duplicate sibling names and names containing `.`
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub color: bool,
    pub pretty: bool,
    /// tracing level used when no `-v` flag is given
    pub log_level: String,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, strict: false }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { color: true, pretty: true, log_level: "warn".to_string() }
    }
}

impl Settings {
    /// An explicit path must exist; otherwise `./genform.toml` is used when
    /// present, and defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let src = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = Self::from_toml(&src)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    pub fn from_toml(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    pub fn limits(&self) -> Limits {
        Limits { max_depth: self.schema.max_depth, strict: self.schema.strict }
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.output
            .log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level `{}`", self.output.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let settings = Settings::from_toml("[schema]\nstrict = true\n").unwrap();
        assert!(settings.schema.strict);
        assert_eq!(settings.schema.max_depth, DEFAULT_MAX_DEPTH);
        assert!(settings.output.color);
        assert_eq!(settings.limits(), Limits { max_depth: DEFAULT_MAX_DEPTH, strict: true });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("[schema]\nmax_nesting = 3\n").is_err());
        assert!(Settings::from_toml("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn log_level_parses() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_level().unwrap(), tracing::Level::WARN);
        settings.output.log_level = "loud".into();
        assert!(settings.log_level().is_err());
    }
}
