//! Selected datasets of one view, persisted on every change.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::StateResult;
use crate::storage::KeyValueStorage;

/// Storage keys for one kind of dataset selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateKeys {
    pub ids: &'static str,
    pub options: &'static str,
}

impl StateKeys {
    pub const TIMESERIES: StateKeys = StateKeys {
        ids: "timeseries-ids",
        options: "timeseries-options",
    };
    pub const TRAJECTORIES: StateKeys = StateKeys {
        ids: "trajectory-ids",
        options: "trajectory-options",
    };
    pub const PROFILES: StateKeys = StateKeys {
        ids: "profile-ids",
        options: "profile-options",
    };
}

/// Display options stored alongside a selected dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOptions {
    pub internal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub saved_at: String,
}

fn default_visible() -> bool {
    true
}

impl DatasetOptions {
    pub fn new(internal_id: impl Into<String>, color: Option<String>) -> Self {
        Self {
            internal_id: internal_id.into(),
            color,
            visible: true,
            saved_at: Utc::now().to_rfc3339(),
        }
    }
}

pub struct DatasetSelection<S: KeyValueStorage> {
    storage: S,
    keys: StateKeys,
    dataset_ids: Vec<String>,
    options: IndexMap<String, DatasetOptions>,
}

impl<S: KeyValueStorage> DatasetSelection<S> {
    /// Restore the selection stored under `keys`; missing keys give an empty selection.
    pub fn load(storage: S, keys: StateKeys) -> StateResult<Self> {
        let dataset_ids: Vec<String> = storage.load_array(keys.ids)?.unwrap_or_default();
        let options = storage
            .load_array::<DatasetOptions>(keys.options)?
            .unwrap_or_default()
            .into_iter()
            .map(|o| (o.internal_id.clone(), o))
            .collect();
        debug!(key = keys.ids, count = dataset_ids.len(), "loaded selection");
        Ok(Self {
            storage,
            keys,
            dataset_ids,
            options,
        })
    }

    pub fn keys(&self) -> StateKeys {
        self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn dataset_ids(&self) -> &[String] {
        &self.dataset_ids
    }

    pub fn has_dataset(&self, internal_id: &str) -> bool {
        self.dataset_ids.iter().any(|id| id == internal_id)
    }

    pub fn has_datasets(&self) -> bool {
        !self.dataset_ids.is_empty()
    }

    pub fn options(&self, internal_id: &str) -> Option<&DatasetOptions> {
        self.options.get(internal_id)
    }

    pub fn all_options(&self) -> impl Iterator<Item = &DatasetOptions> {
        self.options.values()
    }

    /// Select a dataset. Returns `false` if it was already selected.
    ///
    /// If saving fails the in-memory selection is left as it was.
    pub fn add_dataset(&mut self, internal_id: &str, color: Option<String>) -> StateResult<bool> {
        if self.has_dataset(internal_id) {
            return Ok(false);
        }
        self.dataset_ids.push(internal_id.to_string());
        self.options.insert(
            internal_id.to_string(),
            DatasetOptions::new(internal_id, color),
        );
        if let Err(err) = self.save_state() {
            self.dataset_ids.pop();
            self.options.shift_remove(internal_id);
            return Err(err);
        }
        Ok(true)
    }

    /// Deselect a dataset. Returns `false` if it was not selected.
    ///
    /// If saving fails the in-memory selection is left as it was.
    pub fn remove_dataset(&mut self, internal_id: &str) -> StateResult<bool> {
        let Some(index) = self.dataset_ids.iter().position(|id| id == internal_id) else {
            return Ok(false);
        };
        let id = self.dataset_ids.remove(index);
        let removed = self.options.shift_remove_full(internal_id);
        if let Err(err) = self.save_state() {
            self.dataset_ids.insert(index, id);
            if let Some((option_index, key, options)) = removed {
                self.options.shift_insert(option_index, key, options);
            }
            return Err(err);
        }
        Ok(true)
    }

    pub fn remove_all(&mut self) -> StateResult<()> {
        let dataset_ids = std::mem::take(&mut self.dataset_ids);
        let options = std::mem::take(&mut self.options);
        if let Err(err) = self.save_state() {
            self.dataset_ids = dataset_ids;
            self.options = options;
            return Err(err);
        }
        Ok(())
    }

    pub fn set_visible(&mut self, internal_id: &str, visible: bool) -> StateResult<bool> {
        let Some(options) = self.options.get_mut(internal_id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut options.visible, visible);
        if let Err(err) = self.save_state() {
            if let Some(options) = self.options.get_mut(internal_id) {
                options.visible = previous;
            }
            return Err(err);
        }
        Ok(true)
    }

    fn save_state(&mut self) -> StateResult<()> {
        self.storage.save(self.keys.ids, &self.dataset_ids)?;
        let options: Vec<&DatasetOptions> = self.options.values().collect();
        self.storage.save(self.keys.options, &options)?;
        info!(key = self.keys.ids, count = self.dataset_ids.len(), "saved selection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    #[test]
    fn empty_storage_gives_empty_selection() {
        let selection = DatasetSelection::load(MemoryStorage::new(), StateKeys::TIMESERIES).unwrap();
        assert!(!selection.has_datasets());
    }

    #[test]
    fn add_and_remove_persist_immediately() {
        let mut selection =
            DatasetSelection::load(MemoryStorage::new(), StateKeys::TRAJECTORIES).unwrap();
        assert!(selection.add_dataset("ds1", Some("#ff0000".into())).unwrap());
        assert!(!selection.add_dataset("ds1", None).unwrap());
        assert!(selection.add_dataset("ds2", None).unwrap());

        let ids: Vec<String> = selection
            .storage()
            .load_array("trajectory-ids")
            .unwrap()
            .unwrap();
        assert_eq!(ids, vec!["ds1", "ds2"]);

        assert!(selection.remove_dataset("ds1").unwrap());
        assert!(!selection.remove_dataset("ds1").unwrap());
        assert_eq!(selection.dataset_ids(), &["ds2".to_string()]);
        assert!(selection.options("ds1").is_none());

        let reloaded =
            DatasetSelection::load(selection.into_storage(), StateKeys::TRAJECTORIES).unwrap();
        assert_eq!(reloaded.dataset_ids(), &["ds2".to_string()]);
        assert!(reloaded.options("ds2").unwrap().visible);
    }

    #[test]
    fn remove_all_clears_stored_state() {
        let mut selection =
            DatasetSelection::load(MemoryStorage::new(), StateKeys::TIMESERIES).unwrap();
        selection.add_dataset("ds1", None).unwrap();
        selection.remove_all().unwrap();

        let reloaded =
            DatasetSelection::load(selection.into_storage(), StateKeys::TIMESERIES).unwrap();
        assert!(!reloaded.has_datasets());
        assert_eq!(reloaded.all_options().count(), 0);
    }

    #[test]
    fn kinds_do_not_share_keys() {
        let mut timeseries =
            DatasetSelection::load(MemoryStorage::new(), StateKeys::TIMESERIES).unwrap();
        timeseries.add_dataset("ds1", None).unwrap();

        let profiles =
            DatasetSelection::load(timeseries.into_storage(), StateKeys::PROFILES).unwrap();
        assert!(!profiles.has_datasets());
    }

    /// Memory storage whose writes fail once `fail` is set.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail: bool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn save_raw(&mut self, key: &str, json: &str) -> StateResult<()> {
            if self.fail {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.save_raw(key, json)
        }

        fn load_raw(&self, key: &str) -> StateResult<Option<String>> {
            self.inner.load_raw(key)
        }

        fn remove(&mut self, key: &str) -> StateResult<()> {
            self.inner.remove(key)
        }
    }

    fn flaky_selection(ids: &[&str]) -> DatasetSelection<FlakyStorage> {
        let mut selection =
            DatasetSelection::load(FlakyStorage::default(), StateKeys::TIMESERIES).unwrap();
        for id in ids {
            selection.add_dataset(id, None).unwrap();
        }
        selection.storage.fail = true;
        selection
    }

    #[test]
    fn failed_add_leaves_selection_unchanged() {
        let mut selection = flaky_selection(&["ds1"]);
        assert!(selection.add_dataset("ds2", None).is_err());
        assert_eq!(selection.dataset_ids(), &["ds1".to_string()]);
        assert!(selection.options("ds2").is_none());
    }

    #[test]
    fn failed_remove_restores_position_and_options() {
        let mut selection = flaky_selection(&["ds1", "ds2", "ds3"]);
        assert!(selection.remove_dataset("ds2").is_err());
        assert_eq!(
            selection.dataset_ids(),
            &["ds1".to_string(), "ds2".to_string(), "ds3".to_string()]
        );
        let order: Vec<_> = selection.all_options().map(|o| o.internal_id.as_str()).collect();
        assert_eq!(order, vec!["ds1", "ds2", "ds3"]);
    }

    #[test]
    fn failed_remove_all_and_set_visible_roll_back() {
        let mut selection = flaky_selection(&["ds1"]);
        assert!(selection.remove_all().is_err());
        assert!(selection.has_dataset("ds1"));

        assert!(selection.set_visible("ds1", false).is_err());
        assert!(selection.options("ds1").unwrap().visible);

        let stored: Vec<String> = selection
            .storage()
            .load_array(StateKeys::TIMESERIES.ids)
            .unwrap()
            .unwrap();
        assert_eq!(stored, selection.dataset_ids());
    }

    #[test]
    fn set_visible_updates_options() {
        let mut selection =
            DatasetSelection::load(MemoryStorage::new(), StateKeys::PROFILES).unwrap();
        selection.add_dataset("p1", None).unwrap();
        assert!(selection.set_visible("p1", false).unwrap());
        assert!(!selection.set_visible("missing", false).unwrap());
        assert!(!selection.options("p1").unwrap().visible);
    }
}
