//! Error types for toastline-core.

use std::path::PathBuf;

/// Convenience result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Reading a config file failed.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML (or does not match the schema).
    #[error("failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Strict validation found one or more invalid values.
    #[error("invalid configuration:\n{}", format_validation_errors(.0))]
    ConfigValidation(Vec<String>),
}

fn format_validation_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
