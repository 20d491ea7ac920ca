//! Application wiring for the `blobber` command line tool.

use crate::cdn::CdnUrlBuilder;
use crate::identity::ClientIdResolver;
use crate::models::{Config, FileBuffer, FileMetadata, UrlOptions};
use crate::preview::PreviewStore;
use crate::session::UploadSession;
use crate::upload::{UploadClient, UploadService};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// An uploaded file together with its CDN URL.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    #[serde(flatten)]
    pub file: FileMetadata,
    pub url: String,
}

/// Composes the upload client, URL builder and identity resolution.
pub struct App {
    uploader: Arc<dyn UploadService>,
    urls: CdnUrlBuilder,
    client_ids: ClientIdResolver,
    previews: Arc<PreviewStore>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub uploader: Arc<dyn UploadService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, config: Config) -> Self {
        Self {
            uploader: services.uploader,
            urls: CdnUrlBuilder::new(config.client_ids.clone()).with_base_url(config.cdn_url),
            client_ids: config.client_ids,
            previews: Arc::new(PreviewStore::new()),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        info!("Upload endpoint: {}", config.upload_url);
        info!("CDN: {}", config.cdn_url);

        let uploader = UploadClient::new().with_upload_url(config.upload_url.clone());

        Ok(Self::with_services(
            AppServices {
                uploader: Arc::new(uploader),
            },
            config,
        ))
    }

    pub fn previews(&self) -> &Arc<PreviewStore> {
        &self.previews
    }

    /// A fresh single-file upload session sharing this app's services.
    pub fn session(&self, client_id: Option<&str>) -> UploadSession {
        let session = UploadSession::new(
            self.uploader.clone(),
            self.client_ids.clone(),
            self.previews.clone(),
        );
        match client_id {
            Some(id) => session.with_client_id(id),
            None => session,
        }
    }

    pub fn url(&self, id: &str, client_id: Option<&str>, opts: &UrlOptions) -> Result<String> {
        self.urls.build_url(id, client_id, opts)
    }

    /// Upload the files at `paths` in one request and attach a CDN URL to each record.
    pub async fn upload_paths(
        &self,
        paths: &[PathBuf],
        client_id: Option<&str>,
        opts: &UrlOptions,
    ) -> Result<Vec<UploadedFile>> {
        if paths.is_empty() {
            return Err(Error::NoFiles);
        }
        let client_id = self.client_ids.resolve(client_id, "upload")?;

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(read_file(path).await?);
        }

        let records = self.uploader.upload(&files, &client_id).await?;
        info!("Uploaded {} file(s)", records.len());

        records
            .into_iter()
            .map(|file| -> Result<UploadedFile> {
                let url = self.urls.build_url(&file.id, Some(&client_id), opts)?;
                Ok(UploadedFile { file, url })
            })
            .collect()
    }
}

/// Read a file from disk into a [`FileBuffer`] named after its final path component.
pub async fn read_file(path: &Path) -> Result<FileBuffer> {
    let data = tokio::fs::read(path).await?;
    let file = match path.file_name() {
        Some(name) => FileBuffer::new(name.to_string_lossy(), data),
        None => FileBuffer::anonymous(data),
    };
    Ok(file)
}
