//! Configuration loading and port resolution.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error("no listen port: set the PORT environment variable (or --port)")]
    MissingPort,
    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file.
///
/// Only syntactic: semantic validation runs once, after CLI and
/// environment overrides have produced the final config.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve the listen port: CLI flag, then the runtime-provided `PORT`
/// variable, then the config file. Absence everywhere is a fatal
/// configuration error.
pub fn resolve_port(
    cli: Option<u16>,
    env_port: Option<&str>,
    file: Option<u16>,
) -> Result<u16, ConfigError> {
    if let Some(port) = cli {
        return Ok(port);
    }
    if let Some(raw) = env_port {
        return raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw.to_string()));
    }
    file.ok_or(ConfigError::MissingPort)
}
