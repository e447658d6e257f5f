//! Field normalization: raw CSV records → [`MenuItem`]s.
//!
//! Pure and order-preserving. The record's position in the input becomes
//! part of its id, so ids are unique within one load.

use crate::models::{MenuItem, Price, RawRecord, WorldBucket, UNRANKED_BIN};
use crate::transform::classify::{canonical_varietal, classify};

const YES: [&str; 4] = ["yes", "y", "true", "1"];
const NO: [&str; 4] = ["no", "n", "false", "0"];

pub fn is_yes(value: &str) -> bool {
    YES.contains(&value.trim().to_lowercase().as_str())
}

pub fn is_no(value: &str) -> bool {
    NO.contains(&value.trim().to_lowercase().as_str())
}

/// Yes/no-like cell with a per-field default for anything unrecognized.
pub fn parse_flag(value: &str, default: bool) -> bool {
    if is_yes(value) {
        true
    } else if is_no(value) {
        false
    } else {
        default
    }
}

/// Price cell → display value.
///
/// ```
/// use winelist::models::Price;
/// use winelist::transform::normalize::parse_price;
///
/// assert_eq!(parse_price("MP"), Price::MarketPrice);
/// assert_eq!(parse_price("12.50"), Price::Amount("12.5".into()));
/// assert_eq!(parse_price("$12 / $40"), Price::Verbatim("$12 / $40".into()));
/// ```
pub fn parse_price(value: &str) -> Price {
    let s = value.trim();
    if s.is_empty() {
        return Price::Empty;
    }
    if s.eq_ignore_ascii_case("mp") {
        return Price::MarketPrice;
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Price::Amount(n.to_string()),
        _ => Price::Verbatim(s.to_string()),
    }
}

/// Leading integer of a bin cell ("12", "12A"), or [`UNRANKED_BIN`].
pub fn bin_number(value: &str) -> u64 {
    let s = value.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: &str = &s[..s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())];
    digits.parse().unwrap_or(UNRANKED_BIN)
}

/// World cell → bucket. "old" anywhere wins over "new".
pub fn world_bucket(value: &str) -> WorldBucket {
    let w = value.trim().to_lowercase();
    if w.contains("old") {
        WorldBucket::Old
    } else if w.contains("new") {
        WorldBucket::New
    } else {
        WorldBucket::Other(w)
    }
}

/// Normalize one record at position `index`.
pub fn normalize_record(index: usize, record: &RawRecord) -> MenuItem {
    let text = |column: &str| record.cell(column).trim().to_string();

    let name = text("name");
    let bin = text("bin");
    let varietal = text("varietal");
    let canonical = canonical_varietal(&varietal);
    let top_category = classify(&canonical);

    MenuItem {
        id: format!("{}-{}-{}", index, name, bin),
        world_bucket: world_bucket(record.cell("world")),
        world: text("world"),
        country: text("country"),
        region_1: text("region_1"),
        region_2: text("region_2"),
        bin_number: bin_number(&bin),
        vintage: text("vintage"),
        description: text("description"),
        internal_notes: text("internal_notes"),
        stock: text("stock"),
        glass_price: parse_price(record.cell("glass_price")),
        bottle_price: parse_price(record.cell("bottle_price")),
        staff_pick: parse_flag(record.cell("staff_pick"), false),
        visible: parse_flag(record.cell("show"), true),
        canonical_varietal: canonical,
        top_category,
        name,
        bin,
        varietal,
    }
}

/// Normalize all records, keeping input order.
pub fn normalize(records: &[RawRecord]) -> Vec<MenuItem> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| normalize_record(i, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopCategory;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_full_record() {
        let rec = record(&[
            ("name", " Barolo Riserva "),
            ("varietal", "nebbiolo"),
            ("world", "Old"),
            ("country", "Italy"),
            ("bin", " 12 "),
            ("bottle_price", "95.00"),
            ("glass_price", "mp"),
            ("staff_pick", "Y"),
            ("show", ""),
        ]);
        let item = normalize_record(3, &rec);

        assert_eq!(item.id, "3-Barolo Riserva-12");
        assert_eq!(item.name, "Barolo Riserva");
        assert_eq!(item.bin, "12");
        assert_eq!(item.bin_number, 12);
        assert_eq!(item.bottle_price, Price::Amount("95".into()));
        assert_eq!(item.glass_price, Price::MarketPrice);
        assert!(item.staff_pick);
        assert!(item.visible);
        assert_eq!(item.canonical_varietal, "Nebbiolo");
        assert_eq!(item.world_bucket, WorldBucket::Old);
        assert_eq!(item.top_category, TopCategory::Red);
    }

    #[test]
    fn test_missing_columns_are_empty() {
        let item = normalize_record(0, &record(&[("name", "Mystery")]));
        assert_eq!(item.varietal, "");
        assert_eq!(item.bottle_price, Price::Empty);
        assert_eq!(item.bin_number, UNRANKED_BIN);
        assert!(!item.staff_pick);
        assert!(item.visible);
    }

    #[test]
    fn test_ids_unique_and_order_kept() {
        let recs = vec![
            record(&[("name", "Same"), ("bin", "1")]),
            record(&[("name", "Same"), ("bin", "1")]),
        ];
        let items = normalize(&recs);
        assert_eq!(items[0].id, "0-Same-1");
        assert_eq!(items[1].id, "1-Same-1");
    }

    #[test]
    fn test_bin_number() {
        assert_eq!(bin_number("42"), 42);
        assert_eq!(bin_number("12A"), 12);
        assert_eq!(bin_number(" 7 "), 7);
        assert_eq!(bin_number("A12"), UNRANKED_BIN);
        assert_eq!(bin_number(""), UNRANKED_BIN);
        assert_eq!(bin_number("-3"), UNRANKED_BIN);
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag("TRUE", false));
        assert!(!parse_flag("0", true));
        assert!(parse_flag("maybe", true));
        assert!(!parse_flag("maybe", false));
    }

    #[test]
    fn test_world_bucket() {
        assert_eq!(world_bucket("Old World"), WorldBucket::Old);
        assert_eq!(world_bucket("NEW"), WorldBucket::New);
        assert_eq!(world_bucket(" Ancient "), WorldBucket::Other("ancient".into()));
        assert_eq!(world_bucket(""), WorldBucket::Other(String::new()));
    }

    #[test]
    fn test_price_edge_cases() {
        assert_eq!(parse_price(""), Price::Empty);
        assert_eq!(parse_price(" 48 "), Price::Amount("48".into()));
        assert_eq!(parse_price("Mp"), Price::MarketPrice);
        assert_eq!(parse_price("inf"), Price::Verbatim("inf".into()));
    }
}
