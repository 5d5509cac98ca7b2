//! Crate-level error type.

use crate::dataset::DatasetError;
use crate::model::ModelError;
use crate::preprocessing::PipelineError;
use thiserror::Error;

/// Any failure surfaced by a session or the command-line tool.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: Error = PipelineError::SchemaMismatch("schema has no columns".to_string()).into();
        assert_eq!(
            err.to_string(),
            PipelineError::SchemaMismatch("schema has no columns".to_string()).to_string()
        );

        let err: Error = ModelError::InvalidParameter("n_estimators".to_string()).into();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("bad value".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }
}
