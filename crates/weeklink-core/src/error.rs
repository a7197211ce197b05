use crate::capability::Capability;
use thiserror::Error;

/// Result type for key-value store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned when saving a link.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by a host environment query.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("host query failed: {0}")]
    Query(String),
    #[error("host api unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("missing required capabilities: {}", format_missing(.0))]
    Missing(Vec<Capability>),
    #[error("capability query failed: {0}")]
    QueryFailed(String),
}

fn format_missing(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(Capability::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
