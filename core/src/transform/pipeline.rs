//! Load a menu file into an immutable [`MenuSnapshot`].
//!
//! CSV: parse, check the required columns, normalize, drop hidden items.
//! JSON: parse and schema-check the document, convert its wines.
//!
//! # Example
//!
//! ```rust
//! use winelist::{load_csv, Tab, ViewState};
//!
//! let text = "name,varietal,world,country,region_1,region_2,bin,vintage,\
//! glass_price,bottle_price,internal_notes,staff_pick,stock,show,description\n\
//! Barolo,Nebbiolo,Old,Italy,Piedmont,,12,2016,,95,,no,3,yes,\n";
//!
//! let snapshot = load_csv(text, "inline").unwrap();
//! let view = snapshot.view(&ViewState::for_tab(Tab::Red));
//! assert_eq!(view.item_count(), 1);
//! ```
//!
//! A reload is just another call: it yields a new snapshot with a new
//! `load_id`, the old one stays valid for whoever still holds it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{MenuDocument, MenuItem, MenuView, TopCategory, ViewState};
use crate::parser::{decode_content, detect_encoding, parse};
use crate::transform::document::{build_tab_view, document_items, parse_document};
use crate::transform::grouper::{group, varietals, varietals_for};
use crate::transform::normalize::normalize;
use crate::validation::{filter_visible, validate_headers};

/// Menu file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuFormat {
    Csv,
    Json,
}

/// One successful load. Never mutated; a reload builds a new one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    pub load_id: Uuid,
    pub loaded_at: DateTime<Utc>,
    /// Path or URL the file came from.
    pub source: String,
    pub format: MenuFormat,
    /// CSV header row (empty for documents).
    pub headers: Vec<String>,
    /// Rows dropped by the `show` column.
    pub hidden_count: usize,
    items: Vec<MenuItem>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<MenuDocument>,
}

impl MenuSnapshot {
    fn new(
        source: &str,
        format: MenuFormat,
        headers: Vec<String>,
        hidden_count: usize,
        items: Vec<MenuItem>,
        document: Option<MenuDocument>,
    ) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), i))
            .collect();

        Self {
            load_id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            source: source.to_string(),
            format,
            headers,
            hidden_count,
            items,
            index,
            document,
        }
    }

    /// Visible items in file order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up one item by its id.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn document(&self) -> Option<&MenuDocument> {
        self.document.as_ref()
    }

    pub fn varietals(&self) -> Vec<String> {
        varietals(&self.items)
    }

    pub fn varietals_for(&self, category: TopCategory) -> Vec<String> {
        varietals_for(&self.items, category)
    }

    /// The menu as shown for `state`.
    ///
    /// Documents lay out their own tabs; a tab the document lacks (and every
    /// CSV menu) goes through the varietal grouping.
    pub fn view(&self, state: &ViewState) -> MenuView {
        self.document
            .as_ref()
            .and_then(|doc| build_tab_view(doc, &self.items, state))
            .unwrap_or_else(|| group(&self.items, state))
    }
}

/// Load a CSV menu. An empty file has no header row, so every required
/// column is reported missing.
pub fn load_csv(text: &str, source: &str) -> PipelineResult<MenuSnapshot> {
    log_info("📖 Reading menu file...");
    let parsed = parse(text);
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.records.len(),
        parsed.headers.len()
    ));

    let missing = validate_headers(&parsed.headers);
    if !missing.is_empty() {
        log_error(format!("Missing columns: {}", missing.join(", ")));
        return Err(PipelineError::MissingColumns(
            missing.into_iter().map(String::from).collect(),
        ));
    }

    let items = normalize(&parsed.records);
    let total = items.len();
    let items = filter_visible(items);
    let hidden_count = total - items.len();
    if hidden_count > 0 {
        log_warning(format!("{} hidden items dropped", hidden_count));
    }

    for category in TopCategory::ALL {
        let n = items.iter().filter(|i| i.top_category == category).count();
        log_info_indent(format!("{}: {}", category.label(), n), 1);
    }
    log_success(format!("{} items loaded from {}", items.len(), source));

    Ok(MenuSnapshot::new(
        source,
        MenuFormat::Csv,
        parsed.headers,
        hidden_count,
        items,
        None,
    ))
}

/// Load a JSON menu document.
pub fn load_document(text: &str, source: &str) -> PipelineResult<MenuSnapshot> {
    if text.trim().is_empty() {
        log_error("Menu file is empty");
        return Err(PipelineError::EmptyInput);
    }

    log_info("📖 Reading menu document...");
    let doc = parse_document(text).map_err(|e| {
        log_error(e.to_string());
        e
    })?;
    log_success(format!("{} tabs, {} wines", doc.tabs.len(), doc.wines.len()));

    let items = document_items(&doc);
    log_success(format!("{} items loaded from {}", items.len(), source));

    Ok(MenuSnapshot::new(
        source,
        MenuFormat::Json,
        Vec::new(),
        0,
        items,
        Some(doc),
    ))
}

/// Load text in `format`, or sniff it: a leading `{` means a JSON document.
pub fn load_text(text: &str, source: &str, format: Option<MenuFormat>) -> PipelineResult<MenuSnapshot> {
    let text = text.trim_start_matches('\u{feff}');
    let format = format.unwrap_or_else(|| {
        if text.trim_start().starts_with('{') {
            MenuFormat::Json
        } else {
            MenuFormat::Csv
        }
    });

    match format {
        MenuFormat::Csv => load_csv(text, source),
        MenuFormat::Json => load_document(text, source),
    }
}

/// Decode raw file bytes (encoding auto-detected) and load them.
pub fn load_bytes(bytes: &[u8], source: &str, format: Option<MenuFormat>) -> PipelineResult<MenuSnapshot> {
    let encoding = detect_encoding(bytes);
    log_info(format!("Detected encoding: {}", encoding));
    let text = decode_content(bytes, &encoding);
    load_text(&text, source, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, Tab, REQUIRED_COLUMNS};
    use serde_json::json;

    const HEADER: &str = "name,varietal,world,country,region_1,region_2,bin,vintage,glass_price,bottle_price,internal_notes,staff_pick,stock,show,description";

    fn csv(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_show_column() {
        let text = csv(&[
            "Shown,Merlot,New,USA,,,1,,,40,,no,,yes,",
            "Hidden,Merlot,New,USA,,,2,,,40,,no,,no,",
            "Blank,Merlot,New,USA,,,3,,,40,,no,,,",
            "Odd,Merlot,New,USA,,,4,,,40,,no,,maybe,",
        ]);
        let snapshot = load_csv(&text, "test").unwrap();

        let names: Vec<&str> = snapshot.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Shown", "Blank", "Odd"]);
        assert_eq!(snapshot.hidden_count, 1);
        assert_eq!(snapshot.format, MenuFormat::Csv);
    }

    #[test]
    fn test_missing_columns() {
        let text = "name,varietal,world,country,region_1,region_2,bin,vintage,glass_price,internal_notes,staff_pick,stock,show,description\nX,Merlot,,,,,1,,,,,,,";
        let err = load_csv(text, "test").unwrap_err();
        match &err {
            PipelineError::MissingColumns(cols) => assert_eq!(cols, &vec!["bottle_price".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.status_message(), "Menu file is missing columns: bottle_price");
    }

    #[test]
    fn test_empty_csv_names_every_column() {
        for text in ["", "  \n", "\r\n\r\n"] {
            let err = load_csv(text, "test").unwrap_err();
            match &err {
                PipelineError::MissingColumns(cols) => assert_eq!(cols.len(), REQUIRED_COLUMNS.len()),
                other => panic!("unexpected error: {other}"),
            }
            assert!(err.status_message().starts_with("Menu file is missing columns: name, varietal"));
        }
        assert!(matches!(load_text("", "test", None), Err(PipelineError::MissingColumns(_))));
    }

    #[test]
    fn test_empty_document() {
        let err = load_text(" ", "menu.json", Some(MenuFormat::Json)).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn test_leading_blank_line_before_header() {
        let text = format!("\n{}", csv(&["A,Merlot,New,USA,,,1,,,40,,no,,,"]));
        let snapshot = load_csv(&text, "test").unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_header_only() {
        let snapshot = load_csv(HEADER, "test").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.view(&ViewState::default()).is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let text = csv(&["Barolo,Nebbiolo,Old,Italy,Piedmont,,12,2016,,95,,yes,3,,Tar and roses"]);
        let snapshot = load_csv(&text, "test").unwrap();

        let item = snapshot.item("0-Barolo-12").unwrap();
        assert_eq!(item.bottle_price, Price::Amount("95".into()));
        assert!(item.staff_pick);
        assert!(snapshot.item("1-Nope-1").is_none());
    }

    #[test]
    fn test_reload_is_a_new_snapshot() {
        let text = csv(&["Barolo,Nebbiolo,Old,Italy,Piedmont,,12,2016,,95,,no,3,,"]);
        let first = load_csv(&text, "test").unwrap();
        let second = load_csv(&text, "test").unwrap();

        assert_ne!(first.load_id, second.load_id);
        assert_eq!(first.items(), second.items());
    }

    #[test]
    fn test_view_and_varietals() {
        let text = csv(&[
            "A,Merlot,New,USA,,,1,,,40,,no,,,",
            "B,Chardonnay,New,USA,,,2,,,40,,no,,,",
            "C,Prosecco,Old,Italy,,,3,,,40,,no,,,",
        ]);
        let snapshot = load_csv(&text, "test").unwrap();

        assert_eq!(snapshot.varietals(), vec!["Chardonnay", "Merlot", "Prosecco"]);
        assert_eq!(snapshot.varietals_for(TopCategory::Sparkling), vec!["Prosecco"]);
        assert_eq!(snapshot.view(&ViewState::for_tab(Tab::White)).item_count(), 1);
    }

    #[test]
    fn test_load_text_sniffs_json() {
        let doc = json!({
            "tabs": [{ "id": "red", "label": "Red", "categories": [{ "id": "italy", "label": "Italy" }] }],
            "wines": [{ "name": "Barolo", "bin": 12, "price": 95, "tab": "red", "category": "italy" }]
        });
        let snapshot = load_text(&doc.to_string(), "menu", None).unwrap();

        assert_eq!(snapshot.format, MenuFormat::Json);
        assert!(snapshot.document().is_some());
        let view = snapshot.view(&ViewState::from_hash("#red"));
        assert_eq!(view.labels(), vec!["Italy"]);
    }

    #[test]
    fn test_document_missing_tab_falls_back_to_grouping() {
        let doc = json!({
            "tabs": [],
            "wines": [{ "name": "Barolo", "grapes": "Nebbiolo" }]
        });
        let snapshot = load_text(&doc.to_string(), "menu", Some(MenuFormat::Json)).unwrap();
        let view = snapshot.view(&ViewState::for_tab(Tab::Red));
        assert_eq!(view.item_count(), 1);
    }

    #[test]
    fn test_invalid_document() {
        let err = load_text(r#"{"wines": []}"#, "menu", None).unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }

    #[test]
    fn test_load_bytes_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(csv(&["A,Merlot,New,USA,,,1,,,40,,no,,,"]).as_bytes());
        let snapshot = load_bytes(&bytes, "bom.csv", None).unwrap();
        assert_eq!(snapshot.headers[0], "name");
        assert_eq!(snapshot.len(), 1);
    }
}
