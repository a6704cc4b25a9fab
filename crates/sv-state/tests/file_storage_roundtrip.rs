use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sv_state::{DatasetSelection, JsonFileStorage, KeyValueStorage, StateKeys};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

#[test]
fn selection_survives_reload_from_disk() {
    let root = unique_temp_dir("sv_state_selection");
    let storage = JsonFileStorage::new(root.clone()).expect("failed to create storage");

    let mut selection =
        DatasetSelection::load(storage, StateKeys::TIMESERIES).expect("failed to load selection");
    selection
        .add_dataset("http://example.org/api__ts_1", Some("#336699".to_string()))
        .expect("failed to add dataset");
    selection
        .add_dataset("http://example.org/api__ts_2", None)
        .expect("failed to add dataset");

    assert!(root.join("timeseries-ids.json").exists());
    assert!(root.join("timeseries-options.json").exists());

    let storage = JsonFileStorage::new(root.clone()).expect("failed to reopen storage");
    let reloaded =
        DatasetSelection::load(storage, StateKeys::TIMESERIES).expect("failed to reload");
    assert_eq!(reloaded.dataset_ids().len(), 2);
    assert_eq!(
        reloaded
            .options("http://example.org/api__ts_1")
            .and_then(|o| o.color.clone()),
        Some("#336699".to_string())
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn file_storage_remove_and_missing_keys() {
    let root = unique_temp_dir("sv_state_remove");
    let mut storage = JsonFileStorage::new(root.clone()).expect("failed to create storage");

    assert!(storage.load_raw("trajectory-ids").unwrap().is_none());

    storage.save("trajectory-ids", &vec!["t1".to_string()]).unwrap();
    let ids: Vec<String> = storage.load_array("trajectory-ids").unwrap().unwrap();
    assert_eq!(ids, vec!["t1"]);

    storage.remove("trajectory-ids").unwrap();
    storage.remove("trajectory-ids").unwrap();
    assert!(!root.join("trajectory-ids.json").exists());

    let _ = fs::remove_dir_all(&root);
}
