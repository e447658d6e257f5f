//! Error types for the menu loading pipeline.
//!
//! - [`SourceError`] - reading or fetching the data file
//! - [`DocumentError`] - JSON menu document problems
//! - [`ConfigError`] - environment configuration
//! - [`PipelineError`] - top-level load errors
//!
//! Parsing, normalization, classification and grouping are total functions
//! and have no error type: malformed rows degrade to best-effort values.
//! Conversion is automatic via `From` so `?` works across layers.

use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while obtaining the raw menu file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read a local file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Server answered with a non-success status.
    #[error("Failed to load {url} ({status})")]
    BadStatus { url: String, status: u16 },
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::HttpError(e.to_string())
    }
}

// =============================================================================
// Document Errors
// =============================================================================

/// Errors for the JSON menu document (`tabs` + `wines`).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Not valid JSON at all.
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// JSON that does not match the menu document schema.
    #[error("Menu document is invalid: {}", .errors.join("; "))]
    SchemaError { errors: Vec<String> },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown menu kind in `WINELIST_MENU`.
    #[error("Unknown menu kind '{0}' (expected 'wine' or 'whiskey')")]
    UnknownMenuKind(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level load errors.
///
/// Every variant is terminal for the load attempt: there is no partial menu
/// and no retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required CSV columns are absent. Authoring mistake, named explicitly.
    #[error("Menu file is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Source could not be read or fetched.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// JSON document failed to parse or validate.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A JSON document with no content. Empty CSV files report missing columns instead.
    #[error("Menu file is empty")]
    EmptyInput,
}

impl PipelineError {
    /// Single status line shown in place of the menu.
    pub fn status_message(&self) -> String {
        match self {
            PipelineError::MissingColumns(_) => self.to_string(),
            _ => "Menu failed to load. Please check the data file and try again.".to_string(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
