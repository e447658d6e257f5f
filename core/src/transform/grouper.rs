//! Group classified items into the ordered menu view.
//!
//! # Architecture
//!
//! ```text
//! items ──filter(view state)──┬── staff picks ──sort(bin)──────────────▶ "Staff Picks" (pinned)
//!                             │
//!                             └── rest ──group(varietal)──merge(≤2 → Other)──sort(labels)
//!                                          │
//!                                          └─ per bucket: Old World │ New World │ Other
//!                                             rows by country, region_1, region_2, bin, name
//! ```
//!
//! Every stage is a pure function over an ordered list of `(label, rows)`
//! pairs so each can be tested on its own.

use std::cmp::Ordering;

use crate::models::{
    MenuItem, MenuSection, MenuView, Tab, TopCategory, ViewState, WorldBlock,
};

/// Buckets with this many items or fewer fold into the catch-all.
pub const OTHER_MERGE_THRESHOLD: usize = 2;

pub const STAFF_PICKS_LABEL: &str = "Staff Picks";

/// Label for items without a varietal, and the catch-all outside type tabs.
pub const OTHER_LABEL: &str = "Other";

/// Ordered `(label, rows)` buckets.
pub type Buckets<'a> = Vec<(String, Vec<&'a MenuItem>)>;

/// Case-insensitive text comparison.
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Catch-all label for a tab: "Other Red" on the red tab, "Other" elsewhere.
pub fn other_label(tab: Tab) -> String {
    match tab.category() {
        Some(c) => format!("{} {}", OTHER_LABEL, c.label()),
        None => OTHER_LABEL.to_string(),
    }
}

/// "Other" and "Other …" buckets sort after everything else.
pub fn is_other_bucket(label: &str) -> bool {
    let l = label.trim().to_lowercase();
    l == "other" || l.starts_with("other ")
}

/// Items shown for a view state.
///
/// Type tabs keep their category (and varietal, when set); the specials tab
/// keeps items tagged with the active special; "all" keeps everything.
pub fn apply_filter<'a>(items: &'a [MenuItem], state: &ViewState) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| match state.tab {
            Tab::All => true,
            Tab::Specials => state.special.is_some_and(|s| item.has_special(s)),
            tab => {
                tab.category() == Some(item.top_category)
                    && state
                        .varietal
                        .as_ref()
                        .map_or(true, |v| item.canonical_varietal.to_lowercase() == *v)
            }
        })
        .collect()
}

/// Group by canonical varietal, in first-seen order. Blank varietals go to "Other".
pub fn group_by_varietal<'a>(items: &[&'a MenuItem]) -> Buckets<'a> {
    let mut buckets: Buckets<'a> = Vec::new();

    for &item in items {
        let label = if item.canonical_varietal.is_empty() {
            OTHER_LABEL
        } else {
            item.canonical_varietal.as_str()
        };
        match buckets.iter_mut().find(|(l, _)| l == label) {
            Some((_, rows)) => rows.push(item),
            None => buckets.push((label.to_string(), vec![item])),
        }
    }

    buckets
}

/// Fold small buckets into `catch_all`.
///
/// A plain "Other" bucket is never folded for size, but rolls into a typed
/// catch-all ("Other Red") when one is in use.
pub fn merge_small_buckets<'a>(buckets: Buckets<'a>, catch_all: &str) -> Buckets<'a> {
    let mut kept: Buckets<'a> = Vec::new();
    let mut folded: Vec<&'a MenuItem> = Vec::new();

    for (label, rows) in buckets {
        if label != OTHER_LABEL && rows.len() <= OTHER_MERGE_THRESHOLD {
            folded.extend(rows);
        } else {
            kept.push((label, rows));
        }
    }

    let mut merged = kept;
    if !folded.is_empty() {
        push_into(&mut merged, catch_all, folded);
    }

    if catch_all != OTHER_LABEL {
        if let Some(pos) = merged.iter().position(|(l, _)| l == OTHER_LABEL) {
            let (_, rows) = merged.remove(pos);
            push_into(&mut merged, catch_all, rows);
        }
    }

    merged
}

fn push_into<'a>(buckets: &mut Buckets<'a>, label: &str, rows: Vec<&'a MenuItem>) {
    match buckets.iter_mut().find(|(l, _)| l == label) {
        Some((_, existing)) => existing.extend(rows),
        None => buckets.push((label.to_string(), rows)),
    }
}

/// Alphabetical (case-insensitive), with every "Other" bucket last.
pub fn sort_buckets(mut buckets: Buckets<'_>) -> Buckets<'_> {
    buckets.sort_by(|(a, _), (b, _)| {
        is_other_bucket(a)
            .cmp(&is_other_bucket(b))
            .then_with(|| cmp_text(a, b))
    });
    buckets
}

/// Row order inside a world block: country, region_1, region_2, bin, name.
pub fn compare_rows(a: &MenuItem, b: &MenuItem) -> Ordering {
    cmp_text(&a.country, &b.country)
        .then_with(|| cmp_text(&a.region_1, &b.region_1))
        .then_with(|| cmp_text(&a.region_2, &b.region_2))
        .then_with(|| a.bin_number.cmp(&b.bin_number))
        .then_with(|| cmp_text(&a.name, &b.name))
}

/// Split a bucket into Old / New / Other world blocks; empty blocks are omitted.
pub fn world_blocks(rows: &[&MenuItem]) -> Vec<WorldBlock> {
    let mut blocks = Vec::new();

    for rank in 0..3u8 {
        let mut block: Vec<&MenuItem> = rows
            .iter()
            .copied()
            .filter(|r| r.world_bucket.rank() == rank)
            .collect();
        if block.is_empty() {
            continue;
        }
        block.sort_by(|a, b| compare_rows(a, b));

        let (world, label) = (block[0].world_bucket.key(), block[0].world_bucket.label());
        blocks.push(WorldBlock {
            world,
            label,
            items: block.into_iter().cloned().collect(),
        });
    }

    blocks
}

/// Staff picks ordered by bin number only (stable).
pub fn sort_staff_picks(mut rows: Vec<&MenuItem>) -> Vec<&MenuItem> {
    rows.sort_by_key(|r| r.bin_number);
    rows
}

/// Build the ordered view for a view state.
pub fn group(items: &[MenuItem], state: &ViewState) -> MenuView {
    let shown = apply_filter(items, state);
    let (staff, rest): (Vec<&MenuItem>, Vec<&MenuItem>) =
        shown.into_iter().partition(|i| i.staff_pick);

    let mut sections = Vec::new();

    if !staff.is_empty() {
        let rows = sort_staff_picks(staff).into_iter().cloned().collect();
        sections.push(MenuSection::flat(STAFF_PICKS_LABEL, rows).pinned());
    }

    let buckets = sort_buckets(merge_small_buckets(
        group_by_varietal(&rest),
        &other_label(state.tab),
    ));

    for (label, rows) in buckets {
        sections.push(MenuSection::by_world(label, world_blocks(&rows)));
    }

    MenuView {
        state: state.clone(),
        sections,
    }
}

/// Distinct canonical varietals, sorted case-insensitively (filter controls).
pub fn varietals(items: &[MenuItem]) -> Vec<String> {
    distinct_sorted(items.iter())
}

/// Distinct canonical varietals within one category (varietal sub-tabs).
pub fn varietals_for(items: &[MenuItem], category: TopCategory) -> Vec<String> {
    distinct_sorted(items.iter().filter(|i| i.top_category == category))
}

fn distinct_sorted<'a>(items: impl Iterator<Item = &'a MenuItem>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let v = item.canonical_varietal.trim();
        if !v.is_empty() && !out.iter().any(|o| o.eq_ignore_ascii_case(v)) {
            out.push(v.to_string());
        }
    }
    out.sort_by(|a, b| cmp_text(a, b));
    out
}
