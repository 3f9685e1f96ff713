//! Error types for Vista

use thiserror::Error;

/// The main error type for Vista operations
#[derive(Debug, Error)]
pub enum VistaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Import error: {0}")]
    ImportError(String),
}

/// Result type alias for Vista operations
pub type Result<T> = std::result::Result<T, VistaError>;

impl From<toml::de::Error> for VistaError {
    fn from(err: toml::de::Error) -> Self {
        VistaError::TomlParseError(err.to_string())
    }
}
