//! Local preview handles
//!
//! A preview handle is a `blob:` style URL standing for a selected file, usable
//! for display before its upload completes. Every handle must be revoked by its
//! owner; [`PreviewStore::outstanding`] reports the ones still alive.

use crate::models::FileBuffer;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

pub const PREVIEW_SCHEME: &str = "blob:blobber/";

#[derive(Debug, Default)]
pub struct PreviewStore {
    handles: Mutex<HashMap<String, FileBuffer>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self) -> MutexGuard<'_, HashMap<String, FileBuffer>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a copy of `file` and return its handle URL.
    pub fn create(&self, file: &FileBuffer) -> String {
        let url = format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4());
        self.handles().insert(url.clone(), file.clone());
        tracing::debug!("Created preview handle {} for {}", url, file.name);
        url
    }

    /// Release a handle. Returns `false` if it was unknown or already released.
    pub fn revoke(&self, url: &str) -> bool {
        let released = self.handles().remove(url).is_some();
        if released {
            tracing::debug!("Revoked preview handle {}", url);
        }
        released
    }

    pub fn get(&self, url: &str) -> Option<FileBuffer> {
        self.handles().get(url).cloned()
    }

    pub fn outstanding(&self) -> usize {
        self.handles().len()
    }
}
