//! Data models and structures
//!
//! Defines the file metadata returned by the upload service, the in-memory
//! file buffers handed to it, CDN display options and SDK configuration.

use crate::identity::ClientIdResolver;
use crate::mime::detect_mime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.blobber.dev";
pub const DEFAULT_CDN_URL: &str = "https://cdn.blobber.dev";

/// File name used when the caller does not supply one.
pub const DEFAULT_FILE_NAME: &str = "none";

/// Metadata returned by the upload service, one record per stored file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub extension: String,
    pub mimetype: String,
    pub size: u64,
}

/// A file held in memory, ready to be sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBuffer {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileBuffer {
    /// Build a buffer whose content type is sniffed from its leading bytes.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let content_type = detect_mime(&data).to_string();
        Self {
            name: name.into(),
            content_type,
            data,
        }
    }

    /// Buffer without a known file name.
    pub fn anonymous(data: Vec<u8>) -> Self {
        Self::new(DEFAULT_FILE_NAME, data)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inline `data:` URL carrying the file name, usable as a preview without
    /// holding a handle in a [`crate::preview::PreviewStore`].
    pub fn to_data_url(&self) -> String {
        use base64::Engine as _;
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!(
            "data:{};name={};base64,{}",
            self.content_type, self.name, payload
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Cover,
    Contain,
    Fill,
    Inside,
    Outside,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
            Fit::Fill => "fill",
            Fit::Inside => "inside",
            Fit::Outside => "outside",
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cover" => Ok(Fit::Cover),
            "contain" => Ok(Fit::Contain),
            "fill" => Ok(Fit::Fill),
            "inside" => Ok(Fit::Inside),
            "outside" => Ok(Fit::Outside),
            other => Err(format!(
                "Invalid fit '{}'. Expected one of: cover, contain, fill, inside, outside",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpg,
    Jpeg,
    Png,
    Webp,
    Avif,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Jpg => "jpg",
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::Webp => "webp",
            Format::Avif => "avif",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Format::Jpg),
            "jpeg" => Ok(Format::Jpeg),
            "png" => Ok(Format::Png),
            "webp" => Ok(Format::Webp),
            "avif" => Ok(Format::Avif),
            other => Err(format!(
                "Invalid format '{}'. Expected one of: jpg, jpeg, png, webp, avif",
                other
            )),
        }
    }
}

/// Display parameters encoded into a CDN URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<Fit>,
    pub format: Option<Format>,
}

impl UrlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_url: String,
    pub cdn_url: String,
    pub client_ids: ClientIdResolver,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            client_ids: ClientIdResolver::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    ///
    /// The client id itself is not read here: [`ClientIdResolver`] consults its
    /// sources on every call.
    pub fn from_env() -> crate::Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            upload_url: std::env::var("BLOBBER_UPLOAD_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string()),
            cdn_url: std::env::var("BLOBBER_CDN_URL")
                .unwrap_or_else(|_| DEFAULT_CDN_URL.to_string()),
            client_ids: ClientIdResolver::default(),
        })
    }
}
