use thiserror::Error;

/// Fatal errors that abort the pipeline. Isolated per-anchor failures are tracked in
/// [`crate::diagnostics::Diagnostics`] instead of being raised through this type.
#[derive(Debug, Error)]
pub enum BinnerError {
    #[error("malformed input at stage {stage}: {reason}")]
    MalformedInput { stage: String, reason: String },

    #[error("parameter {name} out of range: {value}")]
    InvalidParameter { name: String, value: String },

    #[error("resource exhausted during {stage}: {reason}")]
    ResourceExhausted { stage: String, reason: String },

    #[error(transparent)]
    Io(#[from] binner_io::IoError),

    #[error(transparent)]
    Clustering(#[from] binner_clustering::ClusteringError),

    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
