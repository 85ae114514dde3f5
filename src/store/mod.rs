//! File-backed checkpoint store.
//!
//! Each store is one JSON object on disk mapping synthetic keys
//! (`listing1`, `listing2`, ...) to records. The crawler keeps two of them:
//! the transient *discovered* queue and the durable *completed* output.
//! Loading never fails: a missing or corrupt file yields an empty store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "listing";

/// Checkpoint store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode record for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Ordered key/value store persisted as a single JSON object
#[derive(Debug)]
pub struct CheckpointStore<T> {
    path: PathBuf,
    entries: Map<String, Value>,
    _record: PhantomData<fn() -> T>,
}

impl<T> CheckpointStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates the file with an empty mapping unless it already exists.
    pub fn initialize(path: &Path) -> StoreResult<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        write_atomic(path, b"{}")?;
        info!("{} created as an empty store", path.display());
        Ok(())
    }

    /// Reads the mapping at `path`.
    ///
    /// A missing file is initialized; an unreadable or corrupt one is moved
    /// aside to `<file>.corrupt` and replaced by an empty mapping.
    pub fn load(path: &Path) -> Map<String, Value> {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<Map<String, Value>>(&raw).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(entries) => entries,
            Err(reason) => {
                warn!("Error reading {}: {}. Resetting store.", path.display(), reason);
                if path.exists() {
                    let backup = sibling(path, "corrupt");
                    match std::fs::rename(path, &backup) {
                        Ok(()) => warn!("Moved unreadable store to {}", backup.display()),
                        Err(e) => warn!("Could not move {} aside: {}", path.display(), e),
                    }
                }
                if let Err(e) = Self::initialize(path) {
                    warn!("Could not reinitialize {}: {}", path.display(), e);
                }
                Map::new()
            }
        }
    }

    /// Initializes and loads the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Err(e) = Self::initialize(&path) {
            warn!("Could not initialize {}: {}", path.display(), e);
        }
        let entries = Self::load(&path);
        debug!("Loaded {} entries from {}", entries.len(), path.display());

        Self {
            path,
            entries,
            _record: PhantomData,
        }
    }

    /// Overwrites the file with the full current mapping.
    pub fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(&self.entries).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, &json)
    }

    /// The key the next appended record will receive.
    pub fn next_key(&self) -> String {
        let mut n = self.entries.len() + 1;
        loop {
            let key = format!("{}{}", KEY_PREFIX, n);
            if !self.entries.contains_key(&key) {
                return key;
            }
            n += 1;
        }
    }

    /// Inserts `record` under a fresh key, in memory only.
    pub fn append(&mut self, record: &T) -> StoreResult<String> {
        let value = serde_json::to_value(record).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        let key = self.next_key();
        self.entries.insert(key.clone(), value);
        Ok(key)
    }

    /// Records in insertion order. Entries that do not decode are skipped.
    pub fn records(&self) -> Vec<(String, T)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => Some((key.clone(), record)),
                Err(e) => {
                    warn!("Skipping malformed entry {} in {}: {}", key, self.path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// The `link` of every entry, including entries that do not decode.
    pub fn links(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .values()
            .filter_map(|value| value.get("link").and_then(Value::as_str))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the backing file, consuming the store.
    pub fn remove(self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Writes to a temporary sibling and renames it over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let tmp = sibling(path, "tmp");
    std::fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, ListingRecord};
    use tempfile::TempDir;

    fn candidate(url: &str) -> Candidate {
        Candidate {
            url: url.to_string(),
            found: 1,
        }
    }

    #[test]
    fn initialize_creates_empty_mapping_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("temp.json");

        CheckpointStore::<Candidate>::initialize(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        std::fs::write(&path, r#"{"listing1":{"url":"a","found":1}}"#).unwrap();
        CheckpointStore::<Candidate>::initialize(&path).unwrap();
        assert_eq!(CheckpointStore::<Candidate>::load(&path).len(), 1);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("output.json");

        let entries = CheckpointStore::<Candidate>::load(&path);
        assert!(entries.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_reset_and_kept_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CheckpointStore::<Candidate>::open(&path);
        assert!(store.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("output.json.corrupt")).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn non_object_json_is_treated_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(CheckpointStore::<Candidate>::open(&path).is_empty());
    }

    #[test]
    fn append_save_and_reload_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("temp.json");

        let mut store = CheckpointStore::<Candidate>::open(&path);
        for i in 1..=12 {
            store.append(&candidate(&format!("https://x/p/{}", i))).unwrap();
        }
        store.save().unwrap();

        let reopened = CheckpointStore::<Candidate>::open(&path);
        let records = reopened.records();
        assert_eq!(records.len(), 12);
        assert_eq!(records[0].0, "listing1");
        assert_eq!(records[9].0, "listing10");
        assert_eq!(records[11].1.url, "https://x/p/12");
    }

    #[test]
    fn next_key_never_overwrites_existing_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(
            &path,
            r#"{"listing2":{"url":"a","found":1},"listing3":{"url":"b","found":2}}"#,
        )
        .unwrap();

        let mut store = CheckpointStore::<Candidate>::open(&path);
        assert_eq!(store.next_key(), "listing4");
        store.append(&candidate("c")).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn malformed_entries_are_skipped_but_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(
            &path,
            r#"{"listing1":{"unexpected":true},"listing2":{"url":"b","found":2}}"#,
        )
        .unwrap();

        let mut store = CheckpointStore::<Candidate>::open(&path);
        assert_eq!(store.records().len(), 1);

        store.append(&candidate("c")).unwrap();
        store.save().unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["listing1"]["unexpected"], true);
        assert_eq!(raw["listing3"]["url"], "c");
    }

    #[test]
    fn links_cover_entries_that_do_not_decode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(
            &path,
            r#"{
                "listing1": {"link": "https://x/p/1", "location": {"latitude": [51.5, -0.12]}},
                "listing2": {"title": "no link"},
                "listing3": {"link": "https://x/p/3", "title": "C"}
            }"#,
        )
        .unwrap();

        let store = CheckpointStore::<ListingRecord>::open(&path);
        let links: Vec<&str> = store.links().collect();
        assert_eq!(links, vec!["https://x/p/1", "https://x/p/3"]);
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("temp.json");

        let store = CheckpointStore::<Candidate>::open(&path);
        assert!(path.exists());
        store.remove().unwrap();
        assert!(!path.exists());
    }
}
