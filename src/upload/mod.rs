//! File upload to the Blobber upload endpoint
//!
//! Sends one or more in-memory files as a single multipart POST and returns
//! the metadata records the service assigns to them.

pub mod client;
pub mod mock;

pub use client::UploadClient;
pub use mock::{MockResponse, MockUploadClient};

use crate::models::{FileBuffer, FileMetadata};
use crate::{Error, Result};
use async_trait::async_trait;

/// Multipart field name every file is sent under.
pub const FILE_FIELD: &str = "file";

/// Header carrying the client id.
pub const CLIENT_ID_HEADER: &str = "x-blobber-client-id";

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Upload `files` in one request. Returns one record per stored file,
    /// never an empty list.
    async fn upload(&self, files: &[FileBuffer], client_id: &str) -> Result<Vec<FileMetadata>>;
}

/// Input checks shared by every [`UploadService`]; run before any I/O.
pub(crate) fn validate_request(files: &[FileBuffer], client_id: &str) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoFiles);
    }
    if client_id.is_empty() {
        return Err(Error::Configuration(
            "upload: Blobber Client ID is empty".to_string(),
        ));
    }
    Ok(())
}

/// Checks applied to every successful response: at least one record, each with an id.
pub(crate) fn check_records(status: u16, records: Vec<FileMetadata>) -> Result<Vec<FileMetadata>> {
    let invalid = |reason: &str| Error::Upload {
        status,
        status_text: format!("invalid response body: {}", reason),
    };

    if records.is_empty() {
        return Err(invalid("no file records"));
    }
    if records.iter().any(|f| f.id.is_empty()) {
        return Err(invalid("file record without id"));
    }
    Ok(records)
}
