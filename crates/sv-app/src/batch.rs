//! Record batches: the responses of one round of per-dataset fetches.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sv_grouping::Record;

use crate::error::{AppError, AppResult};

/// Successful records plus the ids whose fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub failed: Vec<String>,
}

impl RecordBatch {
    /// Number of fetches the batch accounts for.
    pub fn expected(&self) -> usize {
        self.records.len() + self.failed.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Records(Vec<Record>),
    Batch(RecordBatch),
}

/// Parse a batch from JSON: either a bare array of records or `{records, failed}`.
pub fn parse_batch(content: &str) -> AppResult<RecordBatch> {
    let file: BatchFile = serde_json::from_str(content)
        .map_err(|e| AppError::InvalidInput(format!("Failed to parse record batch: {}", e)))?;
    Ok(match file {
        BatchFile::Records(records) => RecordBatch {
            records,
            failed: Vec::new(),
        },
        BatchFile::Batch(batch) => batch,
    })
}

pub fn load_batch(path: &Path) -> AppResult<RecordBatch> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        what: "record batch",
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_batch(&content)
}
