//! Single-file upload session
//!
//! Tracks one logical upload for a UI layer: the `Idle -> Loading -> Succeeded | Failed`
//! state, the preview handle of the selected file and a watch channel that
//! notifies subscribers of every transition.

use crate::identity::ClientIdResolver;
use crate::models::{FileBuffer, FileMetadata};
use crate::preview::PreviewStore;
use crate::upload::{check_records, UploadService};
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Loading,
    Succeeded(FileMetadata),
    Failed(String),
}

impl UploadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Loading)
    }

    /// True once the upload ended in success or failure.
    pub fn is_settled(&self) -> bool {
        matches!(self, UploadState::Succeeded(_) | UploadState::Failed(_))
    }

    pub fn result(&self) -> Option<&FileMetadata> {
        match self {
            UploadState::Succeeded(file) => Some(file),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub struct UploadSession {
    uploader: Arc<dyn UploadService>,
    client_ids: ClientIdResolver,
    client_id: Option<String>,
    placeholder_url: Option<String>,
    previews: Arc<PreviewStore>,
    preview_slot: Mutex<Option<String>>,
    state: watch::Sender<UploadState>,
}

impl UploadSession {
    pub fn new(
        uploader: Arc<dyn UploadService>,
        client_ids: ClientIdResolver,
        previews: Arc<PreviewStore>,
    ) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            uploader,
            client_ids,
            client_id: None,
            placeholder_url: None,
            previews,
            preview_slot: Mutex::new(None),
            state,
        }
    }

    /// Explicit client id, taking precedence over the resolver's sources.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// URL reported by [`UploadSession::preview_url`] until a file is selected.
    pub fn with_placeholder_url(mut self, placeholder_url: impl Into<String>) -> Self {
        let url: String = placeholder_url.into();
        self.placeholder_url = Some(url).filter(|url| !url.is_empty());
        self
    }

    fn preview_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.preview_slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn transition(&self, next: UploadState) {
        tracing::debug!("Upload session state -> {:?}", next);
        self.state.send_replace(next);
    }

    /// Release the current preview handle, then create one for `file`.
    fn replace_preview(&self, file: &FileBuffer) {
        let mut slot = self.preview_slot();
        if let Some(previous) = slot.take() {
            self.previews.revoke(&previous);
        }
        *slot = Some(self.previews.create(file));
    }

    /// Upload the selection and keep the first returned record.
    ///
    /// The outcome is both returned and published as the terminal state.
    pub async fn handle_upload(&self, files: Vec<FileBuffer>) -> Result<FileMetadata> {
        self.transition(UploadState::Loading);

        let Some(first) = files.first() else {
            self.transition(UploadState::Failed(Error::NoFiles.to_string()));
            return Err(Error::NoFiles);
        };
        self.replace_preview(first);

        match self.upload_first(&files).await {
            Ok(file) => {
                self.transition(UploadState::Succeeded(file.clone()));
                Ok(file)
            }
            Err(e) => {
                self.transition(UploadState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn upload_first(&self, files: &[FileBuffer]) -> Result<FileMetadata> {
        let client_id = self
            .client_ids
            .resolve(self.client_id.as_deref(), "useUpload")?;

        let records = self.uploader.upload(files, &client_id).await?;
        let mut records = check_records(0, records)?;
        Ok(records.swap_remove(0))
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn file(&self) -> Option<FileMetadata> {
        self.state.borrow().result().cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_string)
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Wait for a terminal state. Pends indefinitely while no upload is started.
    pub async fn settled(&self) -> UploadState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(UploadState::is_settled)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Invoke `callback` with the outcome if the session has settled.
    /// Returns whether it was called.
    pub fn on_settled<F>(&self, callback: F) -> bool
    where
        F: FnOnce(Option<&FileMetadata>, Option<&str>),
    {
        // The watch borrow must not be held while the callback runs.
        let state = self.state.borrow().clone();
        if !state.is_settled() {
            return false;
        }
        callback(state.result(), state.error());
        true
    }

    /// Current preview handle, or the placeholder before any selection.
    pub fn preview_url(&self) -> Option<String> {
        self.preview_slot()
            .clone()
            .or_else(|| self.placeholder_url.clone())
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        if let Some(url) = self.preview_slot().take() {
            self.previews.revoke(&url);
        }
    }
}
