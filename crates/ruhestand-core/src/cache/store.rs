//! Disk-backed namespaced asset store.
//!
//! Each manifest version gets its own bucket directory; a stored asset is
//! a body file plus a JSON meta sidecar, both named after the SHA-1 of the
//! request key. Reads and writes touch one key at a time.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::debug;

/// File name of the activation marker at the cache root.
const ACTIVE_MARKER: &str = "active.json";

/// A stored response body plus the metadata needed to serve it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub key: String,
    pub content_type: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub body: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AssetMeta {
    key: String,
    content_type: Option<String>,
    fetched_at: DateTime<Utc>,
}

/// Record of the most recent namespace takeover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub namespace: String,
    pub activated_at: DateTime<Utc>,
}

impl Activation {
    /// Human-readable age for the status bar.
    pub fn age_display(&self) -> String {
        let minutes = (Utc::now() - self.activated_at).num_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct AssetCache {
    root: PathBuf,
}

impl AssetCache {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    fn file_stem(key: &str) -> String {
        let digest = Sha1::digest(key.as_bytes());
        digest.iter().fold(String::with_capacity(40), |mut out, byte| {
            let _ = write!(out, "{:02x}", byte);
            out
        })
    }

    pub fn write(
        &self,
        namespace: &str,
        key: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<()> {
        let bucket = self.bucket(namespace);
        fs::create_dir_all(&bucket)?;

        let stem = Self::file_stem(key);
        fs::write(bucket.join(format!("{stem}.body")), body)?;

        let meta = AssetMeta {
            key: key.to_string(),
            content_type: content_type.map(String::from),
            fetched_at: Utc::now(),
        };
        fs::write(
            bucket.join(format!("{stem}.json")),
            serde_json::to_string_pretty(&meta)?,
        )?;
        Ok(())
    }

    pub fn read(&self, namespace: &str, key: &str) -> Result<Option<CachedAsset>> {
        let bucket = self.bucket(namespace);
        let stem = Self::file_stem(key);
        let meta_path = bucket.join(format!("{stem}.json"));
        if !meta_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read cache meta for: {}", key))?;
        let meta: AssetMeta = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache meta for: {}", key))?;
        let body = fs::read(bucket.join(format!("{stem}.body")))
            .with_context(|| format!("Failed to read cache body for: {}", key))?;

        Ok(Some(CachedAsset {
            key: meta.key,
            content_type: meta.content_type,
            fetched_at: meta.fetched_at,
            body,
        }))
    }

    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.bucket(namespace)
            .join(format!("{}.json", Self::file_stem(key)))
            .exists()
    }

    /// Names of every bucket currently on disk.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete every bucket except `keep`. Returns the number purged.
    pub fn purge_except(&self, keep: &str) -> Result<usize> {
        let mut purged = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != keep {
                fs::remove_dir_all(entry.path())?;
                purged += 1;
                debug!(namespace = %name, "purged stale cache namespace");
            }
        }
        Ok(purged)
    }

    /// Record `namespace` as the authoritative version, effective
    /// immediately.
    pub fn mark_active(&self, namespace: &str) -> Result<()> {
        let marker = Activation {
            namespace: namespace.to_string(),
            activated_at: Utc::now(),
        };
        fs::write(
            self.root.join(ACTIVE_MARKER),
            serde_json::to_string_pretty(&marker)?,
        )?;
        Ok(())
    }

    pub fn activation(&self) -> Result<Option<Activation>> {
        let path = self.root.join(ACTIVE_MARKER);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

// ============================================================================
// Tests
// ============================================================================
