//! JSON menu document.
//!
//! ```json
//! {
//!   "tabs": [{ "id": "red", "label": "Red", "categories": [{ "id": "italy", "label": "Italy" }] }],
//!   "wines": [{ "name": "Barolo", "bin": 12, "price": 95, "tab": "red", "category": "italy" }]
//! }
//! ```
//!
//! Tabs and their categories are in manager-defined order.

use serde::{Deserialize, Serialize};

/// A cell that authors write either as a string or a number (`bin`, `price`, `vintage`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DocumentCategory {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DocumentTab {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub categories: Vec<DocumentCategory>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWine {
    pub name: String,
    #[serde(default)]
    pub vintage: Option<Scalar>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub grapes: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub bin: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub staff_pick: bool,
    /// Id of the tab this wine belongs to.
    #[serde(default)]
    pub tab: Option<String>,
    /// Id of the category within its tab.
    #[serde(default)]
    pub category: Option<String>,
}

/// The whole document. Validated against the embedded schema before
/// deserialization (see [`crate::validation::validate_document`]).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuDocument {
    pub tabs: Vec<DocumentTab>,
    pub wines: Vec<DocumentWine>,
}

impl MenuDocument {
    pub fn tab(&self, id: &str) -> Option<&DocumentTab> {
        self.tabs.iter().find(|t| t.id.eq_ignore_ascii_case(id.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_fields_accept_both_forms() {
        let wine: DocumentWine = serde_json::from_value(json!({
            "name": "Barolo",
            "bin": 12,
            "price": "mp",
            "vintage": "2016",
            "staffPick": true
        }))
        .unwrap();

        assert_eq!(wine.bin.as_ref().map(Scalar::to_text).as_deref(), Some("12"));
        assert!(wine.bin.as_ref().is_some_and(Scalar::is_number));
        assert_eq!(wine.price, Some(Scalar::Text("mp".into())));
        assert!(wine.staff_pick);
        assert!(wine.tab.is_none());
    }

    #[test]
    fn test_tab_lookup_ignores_case() {
        let doc: MenuDocument = serde_json::from_value(json!({
            "tabs": [{ "id": "red", "label": "Red", "categories": [] }],
            "wines": []
        }))
        .unwrap();
        assert!(doc.tab("RED").is_some());
        assert!(doc.tab("white").is_none());
    }
}
