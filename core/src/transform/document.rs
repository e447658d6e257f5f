//! JSON menu documents: parse, validate and lay out one tab.
//!
//! Layout of a tab:
//!
//! ```text
//! Staff Picks          (staffPick wines of the tab, bin order)
//! <category 1 label>   (document order; wines in bin order)
//! <category 2 label>
//! ...                  (empty categories omitted)
//! ```
//!
//! Staff picks also stay listed under their own category.

use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{DocumentError, DocumentResult};
use crate::models::document::Scalar;
use crate::models::{
    DocumentWine, MenuDocument, MenuItem, MenuSection, MenuView, Price, TopCategory, ViewState,
    WorldBucket,
};
use crate::transform::classify::{canonical_varietal, classify};
use crate::transform::grouper::STAFF_PICKS_LABEL;
use crate::transform::normalize::{bin_number, parse_price};
use crate::validation::validate_document;

/// Parse and schema-check a JSON menu document.
pub fn parse_document(text: &str) -> DocumentResult<MenuDocument> {
    let value: Value = serde_json::from_str(text)?;
    validate_document(&value).map_err(|errors| DocumentError::SchemaError { errors })?;
    Ok(serde_json::from_value(value)?)
}

fn scalar_price(price: Option<&Scalar>) -> Price {
    match price {
        None => Price::Empty,
        Some(Scalar::Number(n)) => parse_price(&n.to_string()),
        Some(Scalar::Text(s)) => parse_price(s),
    }
}

/// Convert a document wine at position `index` into a [`MenuItem`].
///
/// `grapes` plays the varietal, `region` the first region and `note` the
/// description. The top category comes from the wine's tab when that tab is
/// red/white/sparkling, else from classifying the grapes.
pub fn wine_to_item(index: usize, wine: &DocumentWine) -> MenuItem {
    let text = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_string();

    let name = wine.name.trim().to_string();
    let bin = wine.bin.as_ref().map(Scalar::to_text).unwrap_or_default();
    let varietal = text(&wine.grapes);
    let canonical = canonical_varietal(&varietal);
    let top_category = wine
        .tab
        .as_deref()
        .and_then(TopCategory::from_key)
        .unwrap_or_else(|| classify(&canonical));

    MenuItem {
        id: format!("{}-{}-{}", index, name, bin),
        world: String::new(),
        country: String::new(),
        region_1: text(&wine.region),
        region_2: String::new(),
        bin_number: bin_number(&bin),
        vintage: wine.vintage.as_ref().map(Scalar::to_text).unwrap_or_default(),
        description: text(&wine.note),
        internal_notes: String::new(),
        stock: String::new(),
        glass_price: Price::Empty,
        bottle_price: scalar_price(wine.price.as_ref()),
        staff_pick: wine.staff_pick,
        visible: true,
        canonical_varietal: canonical,
        world_bucket: WorldBucket::Other(String::new()),
        top_category,
        name,
        bin,
        varietal,
    }
}

/// Every wine of the document as a menu item, in document order.
pub fn document_items(doc: &MenuDocument) -> Vec<MenuItem> {
    doc.wines
        .iter()
        .enumerate()
        .map(|(i, w)| wine_to_item(i, w))
        .collect()
}

/// Bin order: numeric bins ascending and before the rest, others by text.
/// Blank bins are not numeric.
pub fn compare_bins(a: &str, b: &str) -> Ordering {
    let num = |s: &str| s.trim().parse::<f64>().ok().filter(|n| n.is_finite());
    match (num(a), num(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn same_id(a: Option<&str>, b: &str) -> bool {
    a.is_some_and(|a| a.trim().eq_ignore_ascii_case(b.trim()))
}

/// Lay out one tab of a document. `None` when the document has no such tab.
pub fn build_tab_view(doc: &MenuDocument, items: &[MenuItem], state: &ViewState) -> Option<MenuView> {
    let tab = doc.tab(state.tab.key())?;

    let in_tab: Vec<(&DocumentWine, &MenuItem)> = doc
        .wines
        .iter()
        .zip(items)
        .filter(|(w, _)| same_id(w.tab.as_deref(), &tab.id))
        .collect();

    let by_bin = |mut rows: Vec<&MenuItem>| {
        rows.sort_by(|a, b| compare_bins(&a.bin, &b.bin));
        rows.into_iter().cloned().collect::<Vec<_>>()
    };

    let mut sections = Vec::new();

    let picks: Vec<&MenuItem> = in_tab.iter().filter(|(w, _)| w.staff_pick).map(|(_, i)| *i).collect();
    if !picks.is_empty() {
        sections.push(
            MenuSection::flat(STAFF_PICKS_LABEL, by_bin(picks))
                .pinned()
                .with_subtitle(tab.label.clone()),
        );
    }

    for category in &tab.categories {
        let rows: Vec<&MenuItem> = in_tab
            .iter()
            .filter(|(w, _)| same_id(w.category.as_deref(), &category.id))
            .map(|(_, i)| *i)
            .collect();
        if rows.is_empty() {
            continue;
        }
        sections.push(MenuSection::flat(category.label.clone(), by_bin(rows)).with_subtitle(tab.label.clone()));
    }

    Some(MenuView {
        state: state.clone(),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tab;
    use serde_json::json;

    fn sample() -> MenuDocument {
        serde_json::from_value(json!({
            "tabs": [
                { "id": "red", "label": "Red", "categories": [
                    { "id": "italy", "label": "Italy" },
                    { "id": "france", "label": "France" },
                    { "id": "spain", "label": "Spain" }
                ]},
                { "id": "white", "label": "White", "categories": [] }
            ],
            "wines": [
                { "name": "Bordeaux", "bin": "B2", "price": 80, "tab": "red", "category": "france" },
                { "name": "Barolo", "bin": 12, "price": "MP", "tab": "red", "category": "italy", "staffPick": true },
                { "name": "Chianti", "bin": "3", "price": "45", "tab": "red", "category": "italy" },
                { "name": "Brunello", "tab": "red", "category": "italy" },
                { "name": "Chablis", "bin": 7, "tab": "white", "grapes": "Chardonnay" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_tab_layout() {
        let doc = sample();
        let items = document_items(&doc);
        let view = build_tab_view(&doc, &items, &ViewState::for_tab(Tab::Red)).unwrap();

        assert_eq!(view.labels(), vec![STAFF_PICKS_LABEL, "Italy", "France"]);
        assert!(view.sections[0].pinned);
        assert_eq!(view.sections[0].subtitle.as_deref(), Some("Red"));

        let italy: Vec<&str> = view.section("Italy").unwrap().items().map(|i| i.name.as_str()).collect();
        assert_eq!(italy, vec!["Chianti", "Barolo", "Brunello"]);
    }

    #[test]
    fn test_missing_tab() {
        let doc = sample();
        let items = document_items(&doc);
        assert!(build_tab_view(&doc, &items, &ViewState::for_tab(Tab::Sparkling)).is_none());
    }

    #[test]
    fn test_wine_conversion() {
        let doc = sample();
        let items = document_items(&doc);

        assert_eq!(items[0].id, "0-Bordeaux-B2");
        assert_eq!(items[0].bottle_price, Price::Amount("80".into()));
        assert_eq!(items[1].bottle_price, Price::MarketPrice);
        assert_eq!(items[1].bin_number, 12);
        assert_eq!(items[4].canonical_varietal, "Chardonnay");
        assert_eq!(items[4].top_category, TopCategory::White);
    }

    #[test]
    fn test_compare_bins() {
        assert_eq!(compare_bins("3", "12"), Ordering::Less);
        assert_eq!(compare_bins("12", "B2"), Ordering::Less);
        assert_eq!(compare_bins("", "7"), Ordering::Greater);
        assert_eq!(compare_bins("A", "B"), Ordering::Less);
    }

    #[test]
    fn test_blank_bins_sort_last() {
        assert_eq!(compare_bins("", "0"), Ordering::Greater);
        assert_eq!(compare_bins("  ", "-5"), Ordering::Greater);

        let doc: MenuDocument = serde_json::from_value(json!({
            "tabs": [{ "id": "red", "label": "Red", "categories": [{ "id": "italy", "label": "Italy" }] }],
            "wines": [
                { "name": "No Bin", "bin": "", "tab": "red", "category": "italy" },
                { "name": "Bin Two", "bin": 2, "tab": "red", "category": "italy" },
                { "name": "Bin Zero", "bin": "0", "tab": "red", "category": "italy" }
            ]
        }))
        .unwrap();
        let items = document_items(&doc);
        let view = build_tab_view(&doc, &items, &ViewState::for_tab(Tab::Red)).unwrap();
        let names: Vec<&str> = view.sections[0].items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bin Zero", "Bin Two", "No Bin"]);
    }

    #[test]
    fn test_numeric_prices_match_csv_form() {
        let wine: DocumentWine = serde_json::from_value(json!({ "name": "Chianti", "price": 12.0 })).unwrap();
        let item = wine_to_item(0, &wine);
        assert_eq!(item.bottle_price, Price::Amount("12".into()));
        assert_eq!(item.bottle_price.with_symbol("$"), "$12");

        let wine: DocumentWine = serde_json::from_value(json!({ "name": "Barolo", "price": 12.5 })).unwrap();
        assert_eq!(wine_to_item(1, &wine).bottle_price, Price::Amount("12.5".into()));
    }

    #[test]
    fn test_parse_document_rejects_missing_arrays() {
        let err = parse_document(r#"{"tabs": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::SchemaError { .. }));

        let err = parse_document("not json").unwrap_err();
        assert!(matches!(err, DocumentError::JsonError(_)));
    }

    #[test]
    fn test_parse_document_ok() {
        let text = serde_json::to_string(&sample()).unwrap();
        let doc = parse_document(&text).unwrap();
        assert_eq!(doc.wines.len(), 5);
    }
}
