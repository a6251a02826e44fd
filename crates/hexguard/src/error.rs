//! Error types for loading palettes, themes and configuration.
//!
//! Only setup failures surface as [`HexguardError`]. Problems found while
//! checking a theme (unknown colors, low contrast, a theme that does not
//! parse) are findings, and travel through the report instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any checks happen.
#[derive(Debug, Error)]
pub enum HexguardError {
    /// A required file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed as JSON or YAML.
    #[error("failed to parse {}: {message}", describe(.path))]
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the underlying parser.
        message: String,
    },

    /// The palette document is unusable (wrong shape, missing root key).
    #[error("invalid palette: {0}")]
    Palette(String),

    /// The run configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HexguardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HexguardError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        HexguardError::Parse {
            path,
            message: message.into(),
        }
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<inline>".to_string())
}

/// Result type for hexguard operations.
pub type Result<T> = std::result::Result<T, HexguardError>;
