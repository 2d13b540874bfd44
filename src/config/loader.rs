//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::config::validation::{validate, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Supported on-disk formats, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Parse `content` into an untyped configuration tree.
    pub fn parse(self, content: &str) -> Result<Value, ConfigError> {
        let value: Value = match self {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Toml => toml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        Ok(value)
    }
}

/// Read and parse a configuration file without validating it.
pub fn read_config(path: &Path) -> Result<Value, ConfigError> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content)
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<Value, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("b.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("b.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("b.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("b.ini")), None);
        assert_eq!(Format::from_path(Path::new("config")), None);
    }

    #[test]
    fn test_unsupported_format() {
        let file = write_temp(".ini", "port = 1");
        let err = read_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let file = write_temp(".yaml", "edgemicro:\n  port: over9000\n");
        match load_config(file.path()) {
            Err(ConfigError::Validation(err)) => {
                assert_eq!(err.path(), "config.edgemicro.port");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_surfaces() {
        let file = write_temp(".json", "{ not json");
        assert!(matches!(read_config(file.path()), Err(ConfigError::Json(_))));
    }
}
