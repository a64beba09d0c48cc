use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ParkcastError;

const KEY_SEPARATOR: &str = "_";

/// Build the cache key for a request from its endpoint and ordered parameter values.
#[must_use]
pub fn cache_key(base_url: &str, params: &[&str]) -> String {
    let mut key = String::from(base_url);
    for param in params {
        key.push_str(KEY_SEPARATOR);
        key.push_str(param);
    }
    key
}

/// Raw response bodies persisted as one JSON object file.
///
/// Entries never expire; delete the file to force a refetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl ResponseCache {
    /// An empty cache that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Read the cache file, reporting why it could not be used.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParkcastError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let entries: BTreeMap<String, Value> = serde_json::from_str(&contents)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Read the cache file, starting empty when it is missing or unreadable.
    #[tracing::instrument(name = "open_cache", level = "debug", skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cache) => {
                tracing::debug!("Loaded {} cached responses from {}", cache.len(), path.display());
                cache
            }
            Err(ParkcastError::Io { source }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cache file yet, starting empty");
                Self::empty(path)
            }
            Err(e) => {
                tracing::warn!("Ignoring unusable cache file: {}", e);
                Self::empty(path)
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let entry = self.entries.get(key);
        if entry.is_some() {
            tracing::debug!(key, "Key found");
        } else {
            tracing::debug!(key, "Key not found");
        }
        entry
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the cache file with every entry.
    ///
    /// The contents go to a sibling temporary file first and are renamed over
    /// the target, so a reader never sees a half-written file.
    #[tracing::instrument(name = "save_cache", level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<(), ParkcastError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string(&self.entries)?;
        let mut tmp_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                ParkcastError::cache(format!("Cache path has no file name: {}", self.path.display()))
            })?
            .to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Saved {} cached responses", self.entries.len());
        Ok(())
    }
}
