//! sv-state: persisted selection state (selected dataset ids + per-dataset options).

pub mod selection;
pub mod storage;

pub use selection::{DatasetOptions, DatasetSelection, StateKeys};
pub use storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};

pub type StateResult<T> = Result<T, StateError>;

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },
}
