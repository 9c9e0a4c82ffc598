// ABOUTME: Error types for the studio package
// ABOUTME: Wraps gateway and storage failures alongside input and media errors

use blueprint_ai::GatewayError;
use blueprint_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No media was returned by the generator")]
    NoMedia,
}

pub type Result<T> = std::result::Result<T, StudioError>;
