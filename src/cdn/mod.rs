//! CDN retrieval URLs
//!
//! Derives display URLs for uploaded files from a file id, the client id and
//! optional resize/format parameters. No request is made.

pub mod url;

pub use url::{build_url, CdnUrlBuilder};
