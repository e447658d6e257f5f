//! Transformation module.
//!
//! Raw records to a laid-out menu:
//! - Normalize: raw cells to typed [`MenuItem`](crate::models::MenuItem)s
//! - Classify: canonical varietal and top category
//! - Grouper: filter, bucket and sort for a view state
//! - Document: JSON menu documents
//! - Pipeline: loading a whole file into a snapshot

pub mod classify;
pub mod document;
pub mod grouper;
pub mod normalize;
pub mod pipeline;

pub use classify::{canonical_varietal, classify};
pub use document::{build_tab_view, parse_document};
pub use grouper::{group, varietals, varietals_for};
pub use normalize::normalize;
pub use pipeline::*;
