//! Error types for the storefront.

use std::path::PathBuf;

use storefront_cache::CacheError;
use storefront_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur in storefront actions.
///
/// Ordinary "nothing to do" outcomes (no cart, unknown variant) are not
/// errors; actions report them as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Domain error.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Storage error.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Configuration file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration value is not supported.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A document we produced could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
