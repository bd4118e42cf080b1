use thiserror::Error;

use etfsignal_core::{BatchError, StoreError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("universe file {path}: {reason}")]
    Universe { path: String, reason: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Universe { .. } => 2,
            Self::Batch(_) => 3,
            Self::Serialization(_) => 4,
            Self::Store(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
