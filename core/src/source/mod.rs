//! Where the menu file comes from.
//!
//! The file is read fresh on every load. Remote files are requested with
//! caching disabled so an edited menu shows up on the next load.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::fmt;
use std::path::PathBuf;

use crate::error::{PipelineResult, SourceError, SourceResult};
use crate::logs::log_info;
use crate::transform::pipeline::{load_bytes, MenuFormat, MenuSnapshot};

/// A local path or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSource {
    Path(PathBuf),
    Url(String),
}

impl MenuSource {
    /// `http://` and `https://` arguments are URLs, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        let lower = arg.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MenuSource::Url(arg.to_string())
        } else {
            MenuSource::Path(PathBuf::from(arg))
        }
    }

    /// Format implied by the file extension, if any.
    pub fn format_hint(&self) -> Option<MenuFormat> {
        let name = match self {
            MenuSource::Path(p) => p.to_string_lossy().to_lowercase(),
            MenuSource::Url(u) => u
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_lowercase(),
        };
        if name.ends_with(".json") {
            Some(MenuFormat::Json)
        } else if name.ends_with(".csv") || name.ends_with(".txt") {
            Some(MenuFormat::Csv)
        } else {
            None
        }
    }
}

impl fmt::Display for MenuSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuSource::Path(p) => write!(f, "{}", p.display()),
            MenuSource::Url(u) => f.write_str(u),
        }
    }
}

/// Read or fetch the raw bytes of the menu file.
pub async fn fetch_bytes(source: &MenuSource) -> SourceResult<Vec<u8>> {
    match source {
        MenuSource::Path(path) => Ok(tokio::fs::read(path).await?),
        MenuSource::Url(url) => {
            let response = reqwest::Client::new()
                .get(url)
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::BadStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }

            Ok(response.bytes().await?.to_vec())
        }
    }
}

/// Load a fresh snapshot from a source. Every failure is terminal for this
/// attempt; nothing is retried.
pub async fn load_source(source: &MenuSource) -> PipelineResult<MenuSnapshot> {
    log_info(format!("Loading menu from {}", source));
    let bytes = fetch_bytes(source).await?;
    load_bytes(&bytes, &source.to_string(), source.format_hint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_arg() {
        assert_eq!(
            MenuSource::from_arg("HTTPS://example.com/wines.csv"),
            MenuSource::Url("HTTPS://example.com/wines.csv".into())
        );
        assert_eq!(
            MenuSource::from_arg(" data/wines.csv "),
            MenuSource::Path("data/wines.csv".into())
        );
    }

    #[test]
    fn test_format_hint() {
        assert_eq!(MenuSource::from_arg("wines.JSON").format_hint(), Some(MenuFormat::Json));
        assert_eq!(
            MenuSource::from_arg("https://x.test/menu.json?v=3").format_hint(),
            Some(MenuFormat::Json)
        );
        assert_eq!(MenuSource::from_arg("wines.csv").format_hint(), Some(MenuFormat::Csv));
        assert_eq!(MenuSource::from_arg("menu").format_hint(), None);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "name,varietal,world,country,region_1,region_2,bin,vintage,glass_price,bottle_price,internal_notes,staff_pick,stock,show,description"
        )
        .unwrap();
        writeln!(file, "Barolo,Nebbiolo,Old,Italy,Piedmont,,12,2016,,95,,no,3,yes,Tar and roses").unwrap();
        writeln!(file, "Hidden,Merlot,New,USA,,,13,,,40,,no,0,no,").unwrap();

        let source = MenuSource::Path(file.path().to_path_buf());
        let snapshot = load_source(&source).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.items()[0].name, "Barolo");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let source = MenuSource::Path("/definitely/not/here.csv".into());
        let err = load_source(&source).await.unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::Source(_)));
    }
}
