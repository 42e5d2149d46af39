//! Sequence document store - key-value persistence keyed by sequence id.
//!
//! One JSON document per sequence in a single directory. The engine never
//! talks to storage directly: it receives `Sequence` values and hands back
//! replacements, and callers push those through a `SequenceStore`.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use uuid::Uuid;

use crate::entities::Sequence;

/// Store failures. Missing documents are a distinct case so callers can
/// surface "not found" without string matching.
#[derive(Debug, Clone)]
pub enum StoreError {
    Io(String),
    Corrupt(String),
    NotFound(Uuid),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Store I/O error: {}", e),
            StoreError::Corrupt(e) => write!(f, "Corrupt document: {}", e),
            StoreError::NotFound(id) => write!(f, "Sequence not found: {}", id),
        }
    }
}

impl std::error::Error for StoreError {}

/// Key-value document store boundary, keyed by sequence id.
pub trait SequenceStore {
    /// Fetch a sequence by id
    fn get(&self, id: Uuid) -> Result<Sequence, StoreError>;

    /// Insert or replace a sequence document
    fn put(&mut self, seq: &Sequence) -> Result<(), StoreError>;

    /// Delete a sequence document
    fn remove(&mut self, id: Uuid) -> Result<(), StoreError>;

    /// (id, name) of every stored sequence
    fn list(&self) -> Vec<(Uuid, String)>;
}

/// Directory-backed store: `<dir>/<uuid>.json` per sequence.
pub struct JsonDirStore {
    dir: PathBuf,
    /// id -> name, ordered by scan/insertion for stable listings
    index: IndexMap<Uuid, String>,
}

impl JsonDirStore {
    /// Open (creating if needed) a store at `dir` and scan its documents.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| StoreError::Io(e.to_string()))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut index = IndexMap::new();
        for path in paths {
            match Sequence::from_json(&path) {
                Ok(seq) => {
                    index.insert(seq.uuid, seq.name);
                }
                Err(e) => {
                    // Skip unreadable documents rather than refusing to open
                    log::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        info!("Store opened at {} ({} sequences)", dir.display(), index.len());
        Ok(Self { dir, index })
    }

    /// Platform default location (`<data dir>/sadhana/sequences`)
    pub fn default_dir() -> PathBuf {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sadhana")
            .join("sequences")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn doc_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SequenceStore for JsonDirStore {
    fn get(&self, id: Uuid) -> Result<Sequence, StoreError> {
        let path = self.doc_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        Sequence::from_json(&path).map_err(StoreError::Corrupt)
    }

    fn put(&mut self, seq: &Sequence) -> Result<(), StoreError> {
        seq.to_json(self.doc_path(seq.uuid)).map_err(StoreError::Io)?;
        self.index.insert(seq.uuid, seq.name.clone());
        debug!("Stored sequence {} ({})", seq.uuid, seq.name);
        Ok(())
    }

    fn remove(&mut self, id: Uuid) -> Result<(), StoreError> {
        let path = self.doc_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        fs::remove_file(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        self.index.shift_remove(&id);
        debug!("Removed sequence {}", id);
        Ok(())
    }

    fn list(&self) -> Vec<(Uuid, String)> {
        self.index
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PoseStep, Section};

    fn temp_store(tag: &str) -> JsonDirStore {
        let dir = std::env::temp_dir().join(format!("sadhana-store-{}-{}", tag, Uuid::new_v4()));
        JsonDirStore::open(dir).unwrap()
    }

    fn sample(name: &str) -> Sequence {
        Sequence::new(name).with_sections(vec![
            Section::new("Main").with_items(vec![PoseStep::new("tree", 30).into()])
        ])
    }

    #[test]
    fn test_put_get_round_trip() {
        let mut store = temp_store("rt");
        let seq = sample("Evening Wind Down");
        store.put(&seq).unwrap();

        let loaded = store.get(seq.uuid).unwrap();
        assert_eq!(loaded, seq);

        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = temp_store("missing");
        let id = Uuid::new_v4();
        match store.get(id) {
            Err(StoreError::NotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got {:?}", other),
        }
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_list_and_remove() {
        let mut store = temp_store("list");
        let a = sample("A");
        let b = sample("B");
        store.put(&a).unwrap();
        store.put(&b).unwrap();
        assert_eq!(store.list().len(), 2);

        store.remove(a.uuid).unwrap();
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, b.uuid);

        assert!(matches!(
            store.remove(a.uuid),
            Err(StoreError::NotFound(_))
        ));
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_reopen_rebuilds_index() {
        let mut store = temp_store("reopen");
        let seq = sample("Persisted");
        store.put(&seq).unwrap();
        let dir = store.dir().to_path_buf();
        drop(store);

        let reopened = JsonDirStore::open(&dir).unwrap();
        let listed = reopened.list();
        assert_eq!(listed, vec![(seq.uuid, "Persisted".to_string())]);
        fs::remove_dir_all(dir).ok();
    }
}
