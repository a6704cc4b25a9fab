//! Shared application layer for sensorview.
//!
//! Wires the grouping engine to the persisted dataset selection and exposes
//! the operations the CLI drives: loading record batches, feeding fetch
//! completions into a session, toggling selections and rendering group views.

pub mod batch;
pub mod config;
pub mod error;
pub mod session;
pub mod view;

// Re-export key types for convenience
pub use batch::{RecordBatch, load_batch};
pub use config::SelectorConfig;
pub use error::{AppError, AppResult};
pub use session::SelectionSession;
pub use view::{GroupView, MemberView, snapshot};
