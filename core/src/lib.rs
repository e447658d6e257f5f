//! # Winelist - restaurant wine menu ingestion and classification
//!
//! Winelist loads the spreadsheet a restaurant maintains for its wine list,
//! drops hidden rows, classifies every wine as red, white or sparkling and
//! lays the list out by varietal, world and region for a given view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV / JSON │────▶│   Parser    │────▶│  Normalize  │────▶│  Snapshot   │
//! │ (path, URL) │     │  (auto-enc) │     │ + classify  │     │ (immutable) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │ ViewState
//!                                                              ┌─────▼──────┐
//!                                                              │  MenuView  │
//!                                                              │ (sections) │
//!                                                              └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use winelist::{load_source, MenuSource, ViewState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let snapshot = load_source(&MenuSource::from_arg("data/wines.csv")).await.unwrap();
//!     let view = snapshot.view(&ViewState::from_query("tab=red"));
//!     println!("{} wines in {} sections", view.item_count(), view.sections.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (MenuItem, Price, ViewState, MenuView)
//! - [`parser`] - CSV parsing with encoding auto-detection
//! - [`transform`] - Normalization, classification, grouping and the pipeline
//! - [`validation`] - Required columns, visibility and document schema
//! - [`source`] - Reading the data file from disk or over HTTP
//! - [`config`] - Environment configuration
//! - [`logs`] - Pipeline log entries

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Loading
pub mod config;
pub mod source;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, DocumentError, PipelineError, SourceError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    MenuDocument,
    MenuItem,
    MenuSection,
    MenuView,
    Price,
    RawRecord,
    Special,
    Tab,
    TopCategory,
    ViewState,
    WorldBlock,
    WorldBucket,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_content, detect_encoding, parse, parse_bytes, ParseResult, ParsedCsv};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{filter_visible, is_valid_document, validate_document, validate_headers};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    build_tab_view,
    canonical_varietal,
    classify,
    group,
    normalize,
    parse_document,
    varietals,
    varietals_for,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    load_bytes,
    load_csv,
    load_document,
    load_text,
    MenuFormat,
    MenuSnapshot,
};

pub use config::{Config, MenuKind};
pub use source::{fetch_bytes, load_source, MenuSource};
