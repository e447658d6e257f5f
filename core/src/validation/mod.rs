//! Input validation and visibility filtering.
//!
//! - [`validate_headers`] - required CSV columns (hard stop when any is missing)
//! - [`filter_visible`] - drops items explicitly hidden via the `show` column
//! - [`validate_document`] - JSON menu document against the embedded schema
//!
//! # Example
//!
//! ```rust
//! use winelist::validation::validate_headers;
//!
//! let headers = vec!["name".to_string(), "bin".to_string()];
//! let missing = validate_headers(&headers);
//! assert!(missing.contains(&"varietal"));
//! assert!(!missing.contains(&"bin"));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;

use crate::models::{MenuItem, REQUIRED_COLUMNS};

/// Required columns absent from `headers`, in required-column order.
///
/// Comparison is case-insensitive and ignores surrounding whitespace; extra
/// columns are ignored.
pub fn validate_headers(headers: &[String]) -> Vec<&'static str> {
    let present: HashSet<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.contains(*col))
        .collect()
}

/// Keep every item not explicitly hidden.
///
/// Only a negative `show` value ("no", "n", "false", "0") hides an item;
/// blank or unrecognized values show it.
pub fn filter_visible(items: Vec<MenuItem>) -> Vec<MenuItem> {
    items.into_iter().filter(|i| i.visible).collect()
}

static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/menu-document.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a Draft 7 schema.
///
/// Returns every violation message when invalid.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a JSON menu document (`tabs` + `wines`).
pub fn validate_document(data: &Value) -> Result<(), Vec<String>> {
    validate(&DOCUMENT_SCHEMA, data)
}

/// Quick check against the document schema.
pub fn is_valid_document(data: &Value) -> bool {
    jsonschema::draft7::is_valid(&DOCUMENT_SCHEMA, data)
}
