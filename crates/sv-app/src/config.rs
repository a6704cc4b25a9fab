//! Selector configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sv_core::SortDirection;
use sv_grouping::{Dimension, GroupOrder};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Keep groups sorted by label value instead of first-seen order.
    pub order_groups: bool,
    pub sort_ascending: bool,
    /// Initial `selected` value of every incoming record.
    pub default_selected: bool,
    /// Dimension whose groups are shown.
    pub filter_dimension: Dimension,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            order_groups: false,
            sort_ascending: false,
            default_selected: false,
            filter_dimension: Dimension::Phenomenon,
        }
    }
}

impl SelectorConfig {
    pub fn group_order(&self) -> GroupOrder {
        if self.order_groups {
            GroupOrder::Sorted(SortDirection::from_ascending(self.sort_ascending))
        } else {
            GroupOrder::FirstSeen
        }
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse selector config: {}", e)))
    }

    /// Load from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            what: "config",
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}
