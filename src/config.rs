//! Configuration loaded from TOML
//!
//! ```toml
//! [document]
//! scale = -10        # negative values scale by the reciprocal
//! name = "heart"
//!
//! [output]
//! format = "instructions"
//!
//! [paint]
//! stroke = "black"
//! stroke-width = "1"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::document::PaintAttributes;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How the CLI prints generated instructions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `<path d="..." .../>` element per shape
    #[default]
    Path,
    /// One instruction per line
    Instructions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Initial scale of the document
    pub scale: f64,
    /// Name carried through to diagnostics
    pub name: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Complete configuration; every table and key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub document: DocumentConfig,
    pub output: OutputConfig,
    /// Paint used where neither a shape nor its ancestors set a value
    pub paint: PaintAttributes,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.document.scale = scale;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.document.name = Some(name.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    pub fn with_default_paint(mut self, paint: PaintAttributes) -> Self {
        self.paint = paint;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document.scale, 1.0);
        assert_eq!(config.document.name, None);
        assert_eq!(config.output.format, OutputFormat::Path);
        assert_eq!(config.paint, PaintAttributes::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_toml() {
        let config = Config::from_str(
            r##"
[document]
scale = -10
name = "heart"

[output]
format = "instructions"

[paint]
stroke = "#000"
stroke-linejoin = "round"
"##,
        )
        .expect("Should parse");

        assert_eq!(config.document.scale, -10.0);
        assert_eq!(config.document.name.as_deref(), Some("heart"));
        assert_eq!(config.output.format, OutputFormat::Instructions);
        assert_eq!(config.paint.stroke.as_deref(), Some("#000"));
        assert_eq!(config.paint.stroke_linejoin.as_deref(), Some("round"));
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config = Config::from_str("[document]\nname = \"x\"").unwrap();
        assert_eq!(config.document.scale, 1.0);
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = Config::from_str("[document]\nzoom = 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_bad_format_is_error() {
        assert!(Config::from_str("[output]\nformat = \"png\"").is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::new()
            .with_scale(2.5)
            .with_name("doc")
            .with_format(OutputFormat::Instructions)
            .with_default_paint(PaintAttributes {
                fill: Some("none".to_string()),
                ..Default::default()
            });

        assert_eq!(config.document.scale, 2.5);
        assert_eq!(config.document.name.as_deref(), Some("doc"));
        assert_eq!(config.output.format, OutputFormat::Instructions);
        assert_eq!(config.paint.fill.as_deref(), Some("none"));
    }
}
