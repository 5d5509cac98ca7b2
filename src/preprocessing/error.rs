//! Error types for the feature pipeline.

use crate::dataset::DatasetError;
use thiserror::Error;

/// Error type for feature pipeline operations.
///
/// None of these are retryable: they describe the inputs, not a transient
/// condition, so callers surface them to the user and keep running.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The two sources cannot be joined one-to-one on the identifier column.
    #[error("Join mismatch on {key}: {detail}")]
    JoinMismatch { key: String, detail: String },

    /// A categorical value outside the known vocabulary.
    #[error("Unknown category {value:?} in column {column}")]
    UnknownCategory { column: String, value: String },

    /// The inference vector cannot be aligned to the column schema.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No rows left to build a feature matrix from.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Underlying table error (missing column, wrong column type, I/O).
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
