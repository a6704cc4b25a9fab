//! Grouping engine for timeseries selection lists.
//!
//! Records arrive one at a time and are classified into two independent
//! partitions: one keyed by category, one keyed by phenomenon. Each partition
//! is a [`GroupSet`] that keeps its groups either in first-seen order or sorted
//! by label value.
//!
//! # Architecture
//!
//! - [`GroupingEngine`] owns the records (an arena addressed by [`RecordKey`])
//!   and both partitions
//! - Groups store record keys, so a selection flag lives in exactly one place
//! - Selection changes are reported through a caller-supplied callback
//!
//! [`RecordKey`]: sv_core::RecordKey

pub mod engine;
pub mod group;
pub mod group_set;
pub mod record;

pub use engine::{GroupingEngine, SelectionEvent};
pub use group::Group;
pub use group_set::{GroupOrder, GroupSet};
pub use record::{Dimension, Parameter, Record};
