//! Error types for Retexo operations.
//!
//! This module defines the main error type [`RetexoError`] which represents
//! all possible errors that can occur during content extraction, fetching,
//! and remote store operations.
//!
//! # Example
//!
//! ```rust
//! use retexo_core::{RetexoError, Result};
//!
//! fn extract_article(html: &str) -> Result<String> {
//!     if html.is_empty() {
//!         return Err(RetexoError::NoContent);
//!     }
//!     // ... extraction logic
//!     # Ok(String::new())
//! }
//! ```

use thiserror::Error;

/// Main error type for extraction and store operations.
///
/// Heuristic misses (no body candidate, keyword absent, zero structured
/// records) are deliberately NOT errors — those surface as `Option`/fallback
/// values so a batch can degrade per item instead of aborting.
#[derive(Error, Debug)]
pub enum RetexoError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors.
    ///
    /// Returned when a CSS selector is invalid or extracted markup cannot
    /// be re-serialized.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No content could be extracted from the document.
    ///
    /// Returned when the document has no body element at all — the only
    /// condition under which the locator gives up.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// The remote store has no post for the given identifier.
    #[error("Post not found in the content store: {0}")]
    PostNotFound(String),

    /// Remote content store errors.
    ///
    /// Returned for non-2xx responses and malformed store payloads.
    #[error("Content store request failed: {0}")]
    StoreError(String),

    /// Missing or invalid startup configuration.
    ///
    /// The only fatal-at-startup error; lists every missing variable.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors.
    ///
    /// Wraps standard I/O errors for file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for RetexoError.
///
/// This is a convenience alias for `std::result::Result<T, RetexoError>`.
pub type Result<T> = std::result::Result<T, RetexoError>;
