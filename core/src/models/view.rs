//! View state and the grouped view model handed to presentation code.
//!
//! The active tab, varietal and special are addressable: a [`ViewState`]
//! round-trips through a URL query string (`?tab=red&varietal=merlot`) or,
//! in the hash-routed deployment, a fragment (`#white`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{MenuItem, Special, TopCategory};

// =============================================================================
// Tabs
// =============================================================================

/// Top-level tab of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Red,
    White,
    Sparkling,
    Specials,
}

impl Tab {
    pub fn key(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Red => "red",
            Tab::White => "white",
            Tab::Sparkling => "sparkling",
            Tab::Specials => "specials",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::Red => "Red",
            Tab::White => "White",
            Tab::Sparkling => "Sparkling",
            Tab::Specials => "Specials",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "all" => Some(Tab::All),
            "red" => Some(Tab::Red),
            "white" => Some(Tab::White),
            "sparkling" => Some(Tab::Sparkling),
            "specials" => Some(Tab::Specials),
            _ => None,
        }
    }

    /// The type filter of a red/white/sparkling tab.
    pub fn category(&self) -> Option<TopCategory> {
        match self {
            Tab::Red => Some(TopCategory::Red),
            Tab::White => Some(TopCategory::White),
            Tab::Sparkling => Some(TopCategory::Sparkling),
            Tab::All | Tab::Specials => None,
        }
    }
}

impl From<TopCategory> for Tab {
    fn from(c: TopCategory) -> Self {
        match c {
            TopCategory::Red => Tab::Red,
            TopCategory::White => Tab::White,
            TopCategory::Sparkling => Tab::Sparkling,
        }
    }
}

// =============================================================================
// View State
// =============================================================================

/// Which slice of the menu is showing.
///
/// `varietal` only applies on type tabs, `special` only on the specials tab;
/// the constructors drop them elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub tab: Tab,
    /// Lower-cased canonical varietal.
    pub varietal: Option<String>,
    pub special: Option<Special>,
}

impl ViewState {
    /// Fresh state for a tab. The specials tab opens on "featured".
    pub fn for_tab(tab: Tab) -> Self {
        Self {
            tab,
            varietal: None,
            special: (tab == Tab::Specials).then_some(Special::Featured),
        }
    }

    /// Restrict a type tab to one varietal.
    pub fn with_varietal(mut self, varietal: &str) -> Self {
        let v = varietal.trim().to_lowercase();
        self.varietal = (self.tab.category().is_some() && !v.is_empty()).then_some(v);
        self
    }

    /// Parse URL query parameters `tab`, `varietal`, `special`.
    ///
    /// Unknown or missing tab means "all". Accepts a leading `?`. On the
    /// specials tab a missing `special` means "featured" and an unknown one
    /// selects nothing.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut tab = None;
        let mut varietal = String::new();
        let mut special: Option<Option<Special>> = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "tab" => tab = Tab::from_key(&value),
                "varietal" => varietal = value.trim().to_lowercase(),
                "special" => special = Some(Special::from_key(&value)),
                _ => {}
            }
        }

        let tab = tab.unwrap_or_default();
        let mut state = Self::for_tab(tab).with_varietal(&varietal);
        if tab == Tab::Specials {
            if let Some(s) = special {
                state.special = s;
            }
        }
        state
    }

    /// Parse the hash-routed variant (`#red`). That deployment has no "all"
    /// tab: empty or unknown fragments open on red.
    pub fn from_hash(hash: &str) -> Self {
        let key = hash.trim().trim_start_matches('#').trim().to_lowercase();
        let tab = TopCategory::from_key(&key).map(Tab::from).unwrap_or(Tab::Red);
        Self::for_tab(tab)
    }

    /// Encode as a query string (without `?`), omitting empty parameters.
    pub fn to_query(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        out.append_pair("tab", self.tab.key());
        if let Some(ref v) = self.varietal {
            out.append_pair("varietal", v);
        }
        if let Some(s) = self.special {
            out.append_pair("special", s.key());
        }
        out.finish()
    }
}

// =============================================================================
// View Model
// =============================================================================

/// A world sub-block inside a varietal section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBlock {
    /// "old", "new" or "other".
    pub world: &'static str,
    pub label: &'static str,
    pub items: Vec<MenuItem>,
}

/// Body of a section: a flat list (staff picks, document categories) or
/// world sub-blocks (varietal sections).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum SectionBody {
    Flat { items: Vec<MenuItem> },
    ByWorld { blocks: Vec<WorldBlock> },
}

/// One labelled bucket of the menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    /// Anchor id (slug of the label).
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Staff picks: rendered first, always.
    pub pinned: bool,
    pub body: SectionBody,
}

impl MenuSection {
    pub fn flat(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        let label = label.into();
        Self {
            id: slug(&label),
            label,
            subtitle: None,
            pinned: false,
            body: SectionBody::Flat { items },
        }
    }

    pub fn by_world(label: impl Into<String>, blocks: Vec<WorldBlock>) -> Self {
        let label = label.into();
        Self {
            id: slug(&label),
            label,
            subtitle: None,
            pinned: false,
            body: SectionBody::ByWorld { blocks },
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Items in display order.
    pub fn items(&self) -> Box<dyn Iterator<Item = &MenuItem> + '_> {
        match &self.body {
            SectionBody::Flat { items } => Box::new(items.iter()),
            SectionBody::ByWorld { blocks } => Box::new(blocks.iter().flat_map(|b| b.items.iter())),
        }
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }
}

/// The grouped, ordered menu for one view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub state: ViewState,
    pub sections: Vec<MenuSection>,
}

impl MenuView {
    /// "No items to show".
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.is_empty())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn section(&self, label: &str) -> Option<&MenuSection> {
        self.sections.iter().find(|s| s.label == label)
    }
}

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Anchor id for a label: "Syrah/Shiraz" → "syrah_shiraz".
pub fn slug(label: &str) -> String {
    let lower = label.trim().to_lowercase().replace('&', "and");
    NON_ALNUM.replace_all(&lower, "_").trim_matches('_').to_string()
}
