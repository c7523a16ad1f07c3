//! Error types for driftenv-core

use std::path::PathBuf;

/// Result type for driftenv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, writing, or comparing entries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to resolve '{path}' from provider '{provider}': {message}")]
    Resolution {
        provider: String,
        path: String,
        message: String,
    },

    #[error("Failed to write '{path}' to provider '{provider}': {message}")]
    Write {
        provider: String,
        path: String,
        message: String,
    },

    #[error("Ambiguous match for key '{key}' labeled '{label}': {count} candidates")]
    AmbiguousMatch {
        label: String,
        key: String,
        count: usize,
    },

    #[error("Invalid key path: {message}")]
    InvalidKeyPath { message: String },

    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("Provider '{name}' declares unsupported kind '{kind}'")]
    UnsupportedProviderKind { name: String, kind: String },

    #[error("Failed to parse {format} declarations at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported declarations format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resolution task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn resolution(
        provider: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            provider: provider.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn write(
        provider: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Write {
            provider: provider.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
