//! Timeseries metadata as delivered by the data-fetching layer.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Labeled parameter of a timeseries (its category or phenomenon).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub label: String,
}

impl Parameter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// One selectable timeseries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub selected: bool,
    pub category: Parameter,
    pub phenomenon: Parameter,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        phenomenon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            selected: false,
            category: Parameter::new(category),
            phenomenon: Parameter::new(phenomenon),
        }
    }

    /// Label of this record along `dimension`.
    pub fn label(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Category => &self.category.label,
            Dimension::Phenomenon => &self.phenomenon.label,
        }
    }
}

/// Grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Category,
    #[default]
    Phenomenon,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Category, Dimension::Phenomenon];

    /// The dimension used to order members inside a group.
    pub fn secondary(self) -> Self {
        match self {
            Self::Category => Self::Phenomenon,
            Self::Phenomenon => Self::Category,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Phenomenon => "phenomenon",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
