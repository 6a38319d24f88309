//! Versioned manifest of application shell assets.
//!
//! The asset list is fixed at deployment time; changing it requires
//! bumping the version, which moves the cache into a fresh namespace and
//! lets activation purge the old one.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cache::policy::origin_of;
use crate::settings;

/// Manifest file name in the config directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Environment variable overriding the default shell location.
const SHELL_URL_ENV: &str = "RUHESTAND_SHELL_URL";

/// Where the companion web shell is served from when nothing is configured.
const DEFAULT_BASE_URL: &str = "https://ruhestand.pages.dev";

const DEFAULT_NAME: &str = "countdown";
const DEFAULT_VERSION: u32 = 3;

/// Assets bundled with the application shell.
const DEFAULT_SHELL: &[&str] = &[
    "index.html",
    "styles.css",
    "app.js",
    "manifest.json",
    "icon-192.png",
    "icon-512.png",
    "hourglass.gif",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub name: String,
    pub version: u32,
    /// Origin the shell is served from.
    pub base_url: String,
    pub assets: Vec<String>,
    /// Asset served as the offline fallback for navigations.
    pub root_document: String,
}

impl CacheManifest {
    /// The built-in shell list against a given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: DEFAULT_VERSION,
            base_url: base_url.into(),
            assets: DEFAULT_SHELL.iter().map(|a| a.to_string()).collect(),
            root_document: "index.html".to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Deployment manifest from the config directory if present, else the
    /// built-in shell against `RUHESTAND_SHELL_URL` or its default.
    pub fn load_or_default() -> Result<Self> {
        let path = settings::config_dir()?.join(MANIFEST_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            let base = std::env::var(SHELL_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            Ok(Self::with_base_url(base))
        }
    }

    /// Cache namespace for this version.
    pub fn namespace(&self) -> String {
        format!("{}-v{}", self.name, self.version)
    }

    pub fn asset_url(&self, asset: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            asset.trim_start_matches("./").trim_start_matches('/')
        )
    }

    /// Full URL of the root document.
    pub fn root_url(&self) -> String {
        self.asset_url(&self.root_document)
    }

    /// Origin used for the same-origin checks of the fetch policy.
    pub fn origin(&self) -> Option<String> {
        origin_of(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_encodes_name_and_version() {
        let manifest = CacheManifest::with_base_url("https://example.org");
        assert_eq!(manifest.namespace(), "countdown-v3");

        let bumped = CacheManifest { version: 4, ..manifest };
        assert_eq!(bumped.namespace(), "countdown-v4");
    }

    #[test]
    fn test_asset_url_joins_cleanly() {
        let manifest = CacheManifest::with_base_url("https://example.org/app/");
        assert_eq!(manifest.asset_url("styles.css"), "https://example.org/app/styles.css");
        assert_eq!(manifest.asset_url("./index.html"), "https://example.org/app/index.html");
        assert_eq!(manifest.root_url(), "https://example.org/app/index.html");
    }

    #[test]
    fn test_origin_strips_path() {
        let manifest = CacheManifest::with_base_url("https://example.org/app/");
        assert_eq!(manifest.origin().as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = CacheManifest::with_base_url("https://example.org");
        std::fs::write(&path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();

        assert_eq!(CacheManifest::load(&path).unwrap(), manifest);
    }
}
