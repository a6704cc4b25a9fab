//! sv-core: shared foundation for sensorview.
//!
//! Contains:
//! - ids (compact keys for records held by the grouping engine)
//! - label (numeric label parsing + the total ordering used for sorted groups)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod label;

pub use error::{SvError, SvResult};
pub use ids::*;
pub use label::*;
