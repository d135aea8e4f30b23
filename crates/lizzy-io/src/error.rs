use thiserror::Error;

pub type IoResult<T> = Result<T, IoError>;

/// I/O errors (spec §7): the engine wraps and re-surfaces whatever its
/// results-sink collaborator reports, with context.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to write results to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
