use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur when loading the compiler configuration
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Configuration file not found: {0}")]
    #[diagnostic(
        code(turin_source::config_not_found),
        help("Every package must have a turin.toml file in its root directory")
    )]
    NotFound(PathBuf),

    /// Error reading the configuration file
    #[error("Error reading configuration: {0}")]
    #[diagnostic(
        code(turin_source::config_read_error),
        help("Check file permissions and ensure the file is not corrupted")
    )]
    ReadError(String),

    /// Error parsing the configuration
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(turin_source::config_parse_error),
        help("Check your turin.toml syntax")
    )]
    ParseError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::ReadError(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
