//! Client SDK for the Blobber hosted file service
//!
//! Uploads in-memory files to the Blobber upload endpoint, tracks a single
//! upload for a UI layer, and builds CDN URLs for stored files.

pub mod app;
pub mod cdn;
pub mod error;
pub mod identity;
pub mod mime;
pub mod models;
pub mod preview;
pub mod session;
pub mod upload;

pub use error::{Error, Result};
