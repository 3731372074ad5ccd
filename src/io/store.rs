//! Key-value store implementations and collection (de)serialization
//!
//! - `FileStore` keeps one `<key>.json` file per collection in a directory
//! - `MemoryStore` keeps values in a map, for tests and throwaway sessions
//!
//! Collections are serialized as JSON arrays. A missing key reads as an empty
//! collection.

use crate::core::traits::KeyValueStore;
use crate::types::LedgerError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the user collection
pub const USERS_KEY: &str = "users";
/// Key of the transaction collection
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key of the investment collection
pub const INVESTMENTS_KEY: &str = "investments";

/// Directory-backed store
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| LedgerError::Storage {
            message: format!("Failed to create data directory {}: {}", dir.display(), e),
        })?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::Storage {
                message: format!("Failed to read {}: {}", path.display(), e),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        let path = self.path_for(key);
        // replace through a sibling temp file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(LedgerError::Storage {
                message: format!("Failed to replace {}: {}", path.display(), e),
            });
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a collection, treating an absent or blank value as empty
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Vec<T>, LedgerError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).map_err(|e| LedgerError::Serialization {
                message: format!("Collection '{}' is corrupt: {}", key, e),
            })
        }
        _ => Ok(Vec::new()),
    }
}

/// Serialize and write a whole collection
pub fn save_collection<T, S>(store: &mut S, key: &str, items: &[T]) -> Result<(), LedgerError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let text = serde_json::to_string(items)?;
    store.set(key, &text)?;
    tracing::debug!(key, records = items.len(), "collection persisted");
    Ok(())
}
