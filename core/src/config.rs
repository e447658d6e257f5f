//! Runtime configuration.
//!
//! Read from the environment (and a `.env` file when present):
//!
//! | Variable          | Meaning                                         |
//! |-------------------|-------------------------------------------------|
//! | `WINELIST_SOURCE` | Default data source, a path or http(s) URL      |
//! | `WINELIST_MENU`   | `wine` (default) or `whiskey`                   |
//! | `WINELIST_QUIET`  | yes/no; silences pipeline log echo              |

use std::env;

use crate::error::ConfigError;
use crate::source::MenuSource;
use crate::transform::normalize::is_yes;

pub const ENV_SOURCE: &str = "WINELIST_SOURCE";
pub const ENV_MENU: &str = "WINELIST_MENU";
pub const ENV_QUIET: &str = "WINELIST_QUIET";

/// Which menu a deployment serves by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuKind {
    #[default]
    Wine,
    Whiskey,
}

impl MenuKind {
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        match key.trim().to_lowercase().as_str() {
            "" | "wine" => Ok(MenuKind::Wine),
            "whiskey" => Ok(MenuKind::Whiskey),
            other => Err(ConfigError::UnknownMenuKind(other.to_string())),
        }
    }

    /// Data file used when no source is configured.
    pub fn default_path(&self) -> &'static str {
        match self {
            MenuKind::Wine => "data/wines.csv",
            MenuKind::Whiskey => "data/whiskey.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub source: Option<String>,
    pub menu: MenuKind,
    pub quiet: bool,
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = get(ENV_SOURCE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let menu = MenuKind::from_key(&get(ENV_MENU).unwrap_or_default())?;
        let quiet = get(ENV_QUIET).is_some_and(|v| is_yes(&v));

        Ok(Self { source, menu, quiet })
    }

    /// Source to load: `explicit`, else the configured one, else the menu's default file.
    pub fn resolve_source(&self, explicit: Option<&str>) -> MenuSource {
        let raw = explicit
            .or(self.source.as_deref())
            .unwrap_or_else(|| self.menu.default_path());
        MenuSource::from_arg(raw)
    }
}
