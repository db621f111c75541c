//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineSplitting;
    use std::path::PathBuf;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4221");
        assert_eq!(config.listener.pool_size, 10);
        assert_eq!(config.timeouts.idle_secs, 30);
        assert_eq!(config.parser.line_splitting, LineSplitting::Permissive);
        assert!(config.compression.enabled);
        assert!(config.files.directory.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [listener]
            pool_size = 4

            [parser]
            line_splitting = "strict"

            [files]
            directory = "/srv/files"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.pool_size, 4);
        assert_eq!(config.listener.bind_address, "0.0.0.0:4221");
        assert_eq!(config.parser.line_splitting, LineSplitting::Strict);
        assert_eq!(config.parser.max_header_bytes, 64 * 1024);
        assert_eq!(config.files.directory, Some(PathBuf::from("/srv/files")));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = parse_config("[listener\npool_size = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn semantic_errors_are_validation_errors() {
        let err = parse_config("[listener]\npool_size = 0\n[compression]\nlevel = 11").unwrap_err();
        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
