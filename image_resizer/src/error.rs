use image::{ImageError, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("invalid notification record: {reason}")]
    InvalidRecord { reason: String },

    #[error("failed to read {bucket}/{key}: {source:#}")]
    StorageRead {
        bucket: String,
        key: String,
        source: anyhow::Error,
    },

    #[error("failed to decode image: {source}")]
    Decode { source: ImageError },

    #[error("failed to encode image as {format:?}: {source}")]
    Encode {
        format: ImageFormat,
        source: ImageError,
    },

    #[error("failed to write {bucket}/{key}: {source:#}")]
    StorageWrite {
        bucket: String,
        key: String,
        source: anyhow::Error,
    },

    #[error("resize task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{failed} of {total} records failed: {}", .keys.join(", "))]
    RecordsFailed {
        failed: usize,
        total: usize,
        keys: Vec<String>,
    },
}

impl ResizeError {
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }
}
