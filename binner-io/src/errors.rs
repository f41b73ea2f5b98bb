use thiserror::Error;

/// Errors raised while reading or writing the binner's tabular file formats.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("malformed input at {path}: {reason}")]
    MalformedInput { path: String, reason: String },
    #[error("column {column} not found in {path}")]
    MissingColumn { path: String, column: String },
    #[error("duplicate key {key} found while reading {path}")]
    DuplicateKey { path: String, key: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
