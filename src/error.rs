//! Error handling and custom error types
//!
//! Provides unified error handling across the SDK using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required input (client id, file id) is missing. Raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// Non-2xx response, transport failure or an unreadable response body.
    #[error("Upload failed (status {status}): {status_text}")]
    Upload { status: u16, status_text: String },

    #[error("No files were uploaded")]
    NoFiles,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),
}

impl Error {
    /// HTTP status carried by an upload failure, `0` for transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upload { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
