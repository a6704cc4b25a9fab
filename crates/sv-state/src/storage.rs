//! Key-value storage for selection state.
//!
//! Every key maps to one JSON document. `JsonFileStorage` keeps each document
//! in `<root>/<key>.json`; `MemoryStorage` keeps them in a map.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{StateError, StateResult};

pub trait KeyValueStorage {
    fn save_raw(&mut self, key: &str, json: &str) -> StateResult<()>;

    fn load_raw(&self, key: &str) -> StateResult<Option<String>>;

    fn remove(&mut self, key: &str) -> StateResult<()>;

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StateResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.save_raw(key, &json)
    }

    /// Load a JSON array; a missing key yields `None`.
    fn load_array<T: DeserializeOwned>(&self, key: &str) -> StateResult<Option<Vec<T>>>
    where
        Self: Sized,
    {
        match self.load_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn save_raw(&mut self, key: &str, json: &str) -> StateResult<()> {
        (**self).save_raw(key, json)
    }

    fn load_raw(&self, key: &str) -> StateResult<Option<String>> {
        (**self).load_raw(key)
    }

    fn remove(&mut self, key: &str) -> StateResult<()> {
        (**self).remove(key)
    }
}

fn check_key(key: &str) -> StateResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StateError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    root_dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root_dir: PathBuf) -> StateResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn path_for(&self, key: &str) -> StateResult<PathBuf> {
        check_key(key)?;
        Ok(self.root_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn save_raw(&mut self, key: &str, json: &str) -> StateResult<()> {
        let path = self.path_for(key)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), bytes = json.len(), "saved state");
        Ok(())
    }

    fn load_raw(&self, key: &str) -> StateResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn remove(&mut self, key: &str) -> StateResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn save_raw(&mut self, key: &str, json: &str) -> StateResult<()> {
        check_key(key)?;
        self.entries.insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn load_raw(&self, key: &str) -> StateResult<Option<String>> {
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> StateResult<()> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
