use thiserror::Error;

/// Errors surfaced by the extract and load stages.
///
/// None of these are retried inside the crate; every kind aborts the stage
/// that produced it.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The hashtag fetcher failed (network, status or decoding)
    #[error(transparent)]
    Fetch(anyhow::Error),

    /// A fetched record has no parsable identifier
    #[error("key {field} is either not present or invalid")]
    IdInvalid { field: String },

    /// A record could not be flattened
    #[error(transparent)]
    Flatten(anyhow::Error),

    /// The output sink rejected a write or flush
    #[error("failed to write output: {0}")]
    Sink(anyhow::Error),

    /// The extraction thread for a hashtag panicked
    #[error("extraction worker for hashtag '{key}' panicked")]
    Worker { key: String },
}

impl EtlError {
    /// True for failures caused by malformed fetched data rather than transport
    pub fn is_id_invalid(&self) -> bool {
        matches!(self, EtlError::IdInvalid { .. })
    }
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
