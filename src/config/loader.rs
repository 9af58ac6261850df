//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::PlaygroundConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<PlaygroundConfig, ConfigError> {
    let config: PlaygroundConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PlaygroundConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Apply command-line overrides to the `[client]` table and validate again.
pub fn apply_client_overrides(
    mut config: PlaygroundConfig,
    endpoint: Option<String>,
    deadline_ms: Option<u64>,
) -> Result<PlaygroundConfig, ConfigError> {
    if let Some(endpoint) = endpoint {
        config.client.endpoint = endpoint;
    }
    if let Some(deadline_ms) = deadline_ms {
        config.client.deadline_ms = deadline_ms;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("[client\nendpoint = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: "));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[client]\ndeadline_ms = 0\n[executor]\ntimeout_secs = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: executor.timeout_secs must be greater than zero, \
             client.deadline_ms must be greater than zero"
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playground.toml");
        fs::write(&path, "[server]\nbind_address = \"127.0.0.1:9999\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9999");

        let missing = load_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }

    #[test]
    fn test_client_overrides_are_validated() {
        let config = apply_client_overrides(
            PlaygroundConfig::default(),
            Some("https://play.example.com/execute".into()),
            Some(2500),
        )
        .unwrap();
        assert_eq!(config.client.endpoint, "https://play.example.com/execute");
        assert_eq!(config.client.deadline_ms, 2500);

        let err = apply_client_overrides(PlaygroundConfig::default(), None, Some(0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: client.deadline_ms must be greater than zero"
        );

        let err = apply_client_overrides(
            PlaygroundConfig::default(),
            Some("ftp://example.com/execute".into()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    }
}
