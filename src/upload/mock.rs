use super::{check_records, validate_request, UploadService};
use crate::models::{FileBuffer, FileMetadata};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Canned outcome for one [`MockUploadClient`] call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Files(Vec<FileMetadata>),
    Failure { status: u16, status_text: String },
}

impl MockResponse {
    pub fn status(status: u16, status_text: &str) -> Self {
        MockResponse::Failure {
            status,
            status_text: status_text.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MockUploadClient {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    call_count: Arc<Mutex<usize>>,
    client_ids: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Notify>>,
}

impl MockUploadClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            client_ids: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    pub fn with_response(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_files(self, files: Vec<FileMetadata>) -> Self {
        self.with_response(MockResponse::Files(files))
    }

    pub fn with_failure(self, status: u16, status_text: &str) -> Self {
        self.with_response(MockResponse::status(status, status_text))
    }

    /// Hold every call until `gate` is notified, so in-flight state can be observed.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of calls that got past input validation, i.e. would have hit the network.
    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_client_ids(&self) -> Vec<String> {
        self.client_ids.lock().unwrap().clone()
    }

    fn echo(files: &[FileBuffer], call: usize) -> Vec<FileMetadata> {
        files
            .iter()
            .enumerate()
            .map(|(i, file)| FileMetadata {
                id: format!("mock-{}-{}", call, i),
                name: file.name.clone(),
                extension: file
                    .name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_ascii_lowercase())
                    .unwrap_or_default(),
                mimetype: file.content_type.clone(),
                size: file.data.len() as u64,
            })
            .collect()
    }
}

impl Default for MockUploadClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UploadService for MockUploadClient {
    async fn upload(&self, files: &[FileBuffer], client_id: &str) -> Result<Vec<FileMetadata>> {
        validate_request(files, client_id)?;

        let call = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.client_ids.lock().unwrap().push(client_id.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let response = self.responses.lock().unwrap().pop_front();
        match response {
            Some(MockResponse::Files(records)) => check_records(200, records),
            Some(MockResponse::Failure {
                status,
                status_text,
            }) => Err(Error::Upload {
                status,
                status_text,
            }),
            None => Ok(Self::echo(files, call)),
        }
    }
}
