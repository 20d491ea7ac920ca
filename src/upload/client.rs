use super::{check_records, validate_request, UploadService, CLIENT_ID_HEADER, FILE_FIELD};
use crate::models::{FileBuffer, FileMetadata, DEFAULT_UPLOAD_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};

pub struct UploadClient {
    client: Client,
    upload_url: String,
}

impl Default for UploadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadClient {
    /// Client without a request timeout; the transport's defaults apply.
    pub fn new() -> Self {
        Self::new_with_client(Client::new())
    }

    pub fn new_with_client(client: Client) -> Self {
        Self {
            client,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
        }
    }

    pub fn with_upload_url(mut self, upload_url: String) -> Self {
        self.upload_url = upload_url;
        self
    }

    fn build_form(files: &[FileBuffer]) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for file in files {
            let part = multipart::Part::bytes(file.data.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    Error::Configuration(format!(
                        "upload: invalid content type '{}' for {}: {}",
                        file.content_type, file.name, e
                    ))
                })?;
            form = form.part(FILE_FIELD, part);
        }
        Ok(form)
    }

    fn parse_files(status: StatusCode, body: &str) -> Result<Vec<FileMetadata>> {
        let files: Vec<FileMetadata> = serde_json::from_str(body).map_err(|e| Error::Upload {
            status: status.as_u16(),
            status_text: format!("invalid response body: {}", e),
        })?;

        check_records(status.as_u16(), files)
    }
}

#[async_trait]
impl UploadService for UploadClient {
    async fn upload(&self, files: &[FileBuffer], client_id: &str) -> Result<Vec<FileMetadata>> {
        validate_request(files, client_id)?;
        let form = Self::build_form(files)?;

        tracing::debug!(
            "Uploading {} file(s) to {}",
            files.len(),
            self.upload_url
        );

        // reqwest sets `Content-Type: multipart/form-data; boundary=...` itself.
        let response = self
            .client
            .post(&self.upload_url)
            .header(CLIENT_ID_HEADER, client_id)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                status_text: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Upload response status {}", status);

        if !status.is_success() {
            return Err(Error::Upload {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(|e| Error::Upload {
            status: status.as_u16(),
            status_text: format!("invalid response body: {}", e),
        })?;

        Self::parse_files(status, &body)
    }
}
