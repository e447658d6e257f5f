//! Varietal canonicalization and top-category classification.
//!
//! Classification is an ordered rule table evaluated top to bottom:
//!
//! ```text
//! sparkling keywords  →  Sparkling
//! red keywords        →  Red      (compound names first: "cabernet sauvignon")
//! white keywords      →  White
//! nothing matched     →  Red
//! ```
//!
//! Red is tested before white so "sauvignon" inside a red compound never
//! lands in white. Unmatched varietals land in red.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::TopCategory;

/// Category for varietals no rule recognizes.
pub const DEFAULT_CATEGORY: TopCategory = TopCategory::Red;

/// Ordered (category, phrases) rules. Order is precedence.
pub const CATEGORY_RULES: &[(TopCategory, &[&str])] = &[
    (
        TopCategory::Sparkling,
        &["sparkling", "champagne", "prosecco", "cava", "cremant", "crémant"],
    ),
    (
        TopCategory::Red,
        &[
            "cabernet sauvignon", "cabernet", "cab", "merlot", "pinot noir",
            "syrah", "shiraz", "grenache", "garnacha", "tempranillo",
            "malbec", "sangiovese", "nebbiolo", "barbera", "zinfandel",
            "primitivo", "petite sirah", "mourvedre", "monastrell",
            "cinsault", "carignan", "mencia", "agiorgitiko", "gamay",
        ],
    ),
    (
        TopCategory::White,
        &[
            "chardonnay", "sauvignon blanc", "riesling", "pinot gris", "pinot grigio",
            "moscato", "chenin", "viognier", "verdejo", "vermentino", "gruner", "grüner",
            "albariño", "albarino", "semillon", "sémillon", "gewurztraminer",
            "gewürztraminer", "white",
        ],
    ),
];

/// Synonym folding: any key present → the combined label.
const SYNONYMS: &[(&[&str], &str)] = &[
    (&["syrah", "shiraz"], "Syrah/Shiraz"),
    (&["grenache", "garnacha"], "Grenache/Garnacha"),
];

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[&/\-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Canonical display label for a varietal cell.
///
/// Lower-cases, turns `&`, `/` and `-` into spaces, collapses whitespace,
/// folds synonyms, then title-cases. Empty input stays empty.
///
/// ```
/// use winelist::transform::classify::canonical_varietal;
///
/// assert_eq!(canonical_varietal("  cabernet-sauvignon "), "Cabernet Sauvignon");
/// assert_eq!(canonical_varietal("Shiraz"), canonical_varietal("Syrah"));
/// ```
pub fn canonical_varietal(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return String::new();
    }

    let spaced = SEPARATORS.replace_all(&lower, " ");
    let cleaned = WHITESPACE.replace_all(&spaced, " ");
    let cleaned = cleaned.trim();

    for (keys, label) in SYNONYMS {
        if keys.iter().any(|k| cleaned.contains(k)) {
            return label.to_string();
        }
    }

    title_case(cleaned)
}

/// Upper-case the first letter of each word, keep the rest.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Top category of a (canonical) varietal. Pure and total.
pub fn classify(varietal: &str) -> TopCategory {
    let v = varietal.trim().to_lowercase();

    for (category, phrases) in CATEGORY_RULES {
        if phrases.iter().any(|p| v.contains(p)) {
            return *category;
        }
    }

    DEFAULT_CATEGORY
}
