use thiserror::Error;

pub type SvResult<T> = Result<T, SvError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SvError {
    #[error("Unknown record: {key}")]
    UnknownRecord { key: String },

    #[error("Unknown {dimension} group: {label}")]
    UnknownGroup {
        dimension: &'static str,
        label: String,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
