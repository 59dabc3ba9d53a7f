use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegeError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    InvalidBatch { message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RegeError {
    pub fn invalid_batch(message: impl Into<String>) -> Self {
        Self::InvalidBatch { message: message.into() }
    }
}

pub type RegeResult<T> = Result<T, RegeError>;
