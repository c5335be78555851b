//! Error taxonomy for tracker processing.
//!
//! None of these escape the core pipeline: parsing and formatting degrade to
//! empty output and log the error instead. Only configuration loading returns
//! them to the caller.

use thiserror::Error;

use crate::snapshot::Category;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// A category's raw data failed structural parsing.
    #[error("malformed {category} payload: {reason}")]
    MalformedPayload { category: Category, reason: String },

    /// Structured data parsed but did not match the category's shape.
    #[error("unrecognized {category} shape: {detail}")]
    UnknownShape { category: Category, detail: String },

    /// A referenced configuration entry is absent.
    #[error("missing configuration entry: {0}")]
    MissingConfig(String),

    /// Configuration text could not be deserialized.
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
}
