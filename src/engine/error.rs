//! Engine error types.

use crate::storage::StorageError;

/// Engine error type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
