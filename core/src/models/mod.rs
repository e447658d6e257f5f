//! Domain models for the menu pipeline.
//!
//! - [`RawRecord`] - one parsed CSV row, header → raw cell
//! - [`MenuItem`] - normalized, classified menu entry
//! - [`Price`] - display value of a glass/bottle price
//! - [`WorldBucket`] - Old World / New World / other
//! - [`TopCategory`] - red, white or sparkling
//! - [`Special`] - promotional tags matched against internal notes
//! - [`view`] - view state and grouped view model
//! - [`document`] - JSON menu document (`tabs` + `wines`)

pub mod document;
pub mod view;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub use document::{DocumentCategory, DocumentTab, DocumentWine, MenuDocument};
pub use view::{MenuSection, MenuView, Tab, ViewState, WorldBlock};

/// Bin number given to items whose bin has no leading integer, so they sort last.
pub const UNRANKED_BIN: u64 = 999_999;

/// Columns every CSV menu file must carry (compared case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "name",
    "varietal",
    "world",
    "country",
    "region_1",
    "region_2",
    "bin",
    "vintage",
    "glass_price",
    "bottle_price",
    "internal_notes",
    "staff_pick",
    "stock",
    "show",
    "description",
];

// =============================================================================
// Raw Record
// =============================================================================

/// One data row of a CSV file, keyed by header cell.
///
/// Keeps header order. Lookups compare header names case-insensitively, the
/// way consumers of the parser are expected to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Raw cell for a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(column))
            .map(|(_, v)| v.as_str())
    }

    /// Raw cell for a column, or `""` when absent.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// =============================================================================
// Price
// =============================================================================

/// Display value of a price cell.
///
/// No currency symbol is attached here; see [`Price::with_symbol`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Price {
    /// Empty cell.
    Empty,
    /// "mp": price varies.
    MarketPrice,
    /// A parseable number, in its canonical numeric form ("12.50" → "12.5").
    Amount(String),
    /// Anything else, passed through (e.g. "$12 / $40").
    Verbatim(String),
}

/// Marker shown for market-price items.
pub const MARKET_PRICE: &str = "mp";

impl Price {
    pub fn as_str(&self) -> &str {
        match self {
            Price::Empty => "",
            Price::MarketPrice => MARKET_PRICE,
            Price::Amount(s) | Price::Verbatim(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Price::Empty)
    }

    /// Presentation form: prefixes `symbol` unless already present. Market
    /// price and empty values are returned unchanged.
    pub fn with_symbol(&self, symbol: &str) -> String {
        match self {
            Price::Empty => String::new(),
            Price::MarketPrice => MARKET_PRICE.to_string(),
            Price::Amount(s) | Price::Verbatim(s) => {
                if s.starts_with(symbol) {
                    s.clone()
                } else {
                    format!("{}{}", symbol, s)
                }
            }
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// World Bucket
// =============================================================================

/// Coarse geographic grouping used as a sub-block within a varietal section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorldBucket {
    Old,
    New,
    /// Free-text world, lower-cased. Kept for future grouping, shown as "Other".
    Other(String),
}

impl WorldBucket {
    /// Short key ("old", "new", "other").
    pub fn key(&self) -> &'static str {
        match self {
            WorldBucket::Old => "old",
            WorldBucket::New => "new",
            WorldBucket::Other(_) => "other",
        }
    }

    /// Heading shown above a world sub-block.
    pub fn label(&self) -> &'static str {
        match self {
            WorldBucket::Old => "Old World",
            WorldBucket::New => "New World",
            WorldBucket::Other(_) => "Other",
        }
    }

    /// Position in the fixed Old → New → Other order.
    pub fn rank(&self) -> u8 {
        match self {
            WorldBucket::Old => 0,
            WorldBucket::New => 1,
            WorldBucket::Other(_) => 2,
        }
    }
}

impl Serialize for WorldBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

// =============================================================================
// Top Category
// =============================================================================

/// Top-level section of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopCategory {
    Red,
    White,
    Sparkling,
}

impl TopCategory {
    pub const ALL: [TopCategory; 3] = [TopCategory::Red, TopCategory::White, TopCategory::Sparkling];

    pub fn key(&self) -> &'static str {
        match self {
            TopCategory::Red => "red",
            TopCategory::White => "white",
            TopCategory::Sparkling => "sparkling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopCategory::Red => "Red",
            TopCategory::White => "White",
            TopCategory::Sparkling => "Sparkling",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "red" => Some(TopCategory::Red),
            "white" => Some(TopCategory::White),
            "sparkling" => Some(TopCategory::Sparkling),
            _ => None,
        }
    }
}

// =============================================================================
// Specials
// =============================================================================

/// Promotional tag, matched against free-text internal notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    Featured,
    HighRoller,
    Valentines,
}

impl Special {
    pub const ALL: [Special; 3] = [Special::Featured, Special::HighRoller, Special::Valentines];

    /// URL key.
    pub fn key(&self) -> &'static str {
        match self {
            Special::Featured => "featured",
            Special::HighRoller => "high_roller",
            Special::Valentines => "valentines",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Special::Featured => "Featured",
            Special::HighRoller => "High Roller",
            Special::Valentines => "Valentine's",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "featured" => Some(Special::Featured),
            "high_roller" => Some(Special::HighRoller),
            "valentines" => Some(Special::Valentines),
            _ => None,
        }
    }

    /// Phrases whose presence in the notes marks an item with this tag.
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            Special::Featured => &["featured"],
            Special::HighRoller => &["high_roller", "high roller", "highroller"],
            Special::Valentines => &["valentine"],
        }
    }

    /// Case-insensitive substring test. Empty notes never match.
    pub fn matches(&self, notes: &str) -> bool {
        let notes = notes.trim().to_lowercase();
        if notes.is_empty() {
            return false;
        }
        self.phrases().iter().any(|p| notes.contains(p))
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A normalized, classified menu entry.
///
/// Built from exactly one [`RawRecord`] and its position in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// `{index}-{name}-{bin}`; the only key used for item lookup.
    pub id: String,
    pub name: String,
    pub varietal: String,
    pub world: String,
    pub country: String,
    pub region_1: String,
    pub region_2: String,
    /// Raw bin text as written; always displayed instead of `bin_number`.
    pub bin: String,
    pub vintage: String,
    pub description: String,
    pub internal_notes: String,
    pub stock: String,
    /// Sort key only, never compared for equality.
    pub bin_number: u64,
    pub glass_price: Price,
    pub bottle_price: Price,
    pub staff_pick: bool,
    pub visible: bool,
    pub canonical_varietal: String,
    pub world_bucket: WorldBucket,
    pub top_category: TopCategory,
}

impl MenuItem {
    /// "region_2, region_1, country", skipping empty parts.
    pub fn location(&self) -> String {
        [&self.region_2, &self.region_1, &self.country]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "region_2, region_1" when both exist, else whichever does.
    pub fn short_location(&self) -> String {
        match (self.region_2.is_empty(), self.region_1.is_empty()) {
            (false, false) => format!("{}, {}", self.region_2, self.region_1),
            (false, true) => self.region_2.clone(),
            (true, false) => self.region_1.clone(),
            (true, true) => String::new(),
        }
    }

    /// Row subtitle: short location and vintage.
    pub fn subtitle(&self) -> String {
        [self.short_location(), self.vintage.clone()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ")
    }

    /// Whether this item carries the given special tag.
    pub fn has_special(&self, special: Special) -> bool {
        special.matches(&self.internal_notes)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::item;
    use super::*;

    #[test]
    fn test_raw_record_case_insensitive_lookup() {
        let rec = RawRecord::new(vec![
            ("Name".to_string(), "Barolo".to_string()),
            ("BIN".to_string(), "12".to_string()),
        ]);
        assert_eq!(rec.get("name"), Some("Barolo"));
        assert_eq!(rec.cell("bin"), "12");
        assert_eq!(rec.cell("vintage"), "");
    }

    #[test]
    fn test_raw_record_serializes_in_header_order() {
        let rec = RawRecord::new(vec![
            ("name".to_string(), "Barolo".to_string()),
            ("bin".to_string(), "12".to_string()),
        ]);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"name":"Barolo","bin":"12"}"#);
    }

    #[test]
    fn test_price_with_symbol() {
        assert_eq!(Price::Amount("48".into()).with_symbol("$"), "$48");
        assert_eq!(Price::Verbatim("$12 / $40".into()).with_symbol("$"), "$12 / $40");
        assert_eq!(Price::MarketPrice.with_symbol("$"), "mp");
        assert_eq!(Price::Empty.with_symbol("$"), "");
    }

    #[test]
    fn test_special_matching() {
        assert!(Special::Featured.matches("FEATURED this week"));
        assert!(Special::HighRoller.matches("high roller list"));
        assert!(Special::HighRoller.matches("tag:highroller"));
        assert!(Special::Valentines.matches("Valentines dinner"));
        assert!(!Special::Featured.matches(""));
        assert!(!Special::Featured.matches("   "));
        assert!(!Special::Valentines.matches("featured"));
    }

    #[test]
    fn test_locations() {
        let mut w = item("1", "Nebbiolo", TopCategory::Red);
        w.country = "Italy".into();
        w.region_1 = "Piedmont".into();
        w.region_2 = "Barolo".into();
        w.vintage = "2016".into();
        assert_eq!(w.location(), "Barolo, Piedmont, Italy");
        assert_eq!(w.short_location(), "Barolo, Piedmont");
        assert_eq!(w.subtitle(), "Barolo, Piedmont · 2016");

        w.region_2.clear();
        assert_eq!(w.short_location(), "Piedmont");
    }

    #[test]
    fn test_world_bucket_serializes_as_key() {
        let json = serde_json::to_string(&WorldBucket::Other("ancient".into())).unwrap();
        assert_eq!(json, "\"other\"");
        assert_eq!(WorldBucket::Old.label(), "Old World");
    }
}
