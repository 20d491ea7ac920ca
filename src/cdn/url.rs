use crate::identity::ClientIdResolver;
use crate::models::{UrlOptions, DEFAULT_CDN_URL};
use crate::{Error, Result};

/// Build a CDN URL for an already-resolved client id.
///
/// Layout: `<base>/<client_id>/[fit-F,height-H,width-W/]<id>[.<format>]`.
/// Zero width or height counts as absent.
pub fn build_url(base_url: &str, id: &str, client_id: &str, opts: &UrlOptions) -> Result<String> {
    if id.is_empty() {
        return Err(Error::Configuration(
            "getUrl: File ID not found. Pass Blobber File ID as 'id' property to getUrl config"
                .to_string(),
        ));
    }
    if client_id.is_empty() {
        return Err(Error::Configuration(
            "getUrl: Blobber Client ID not found".to_string(),
        ));
    }

    let mut params = Vec::with_capacity(3);
    if let Some(fit) = opts.fit {
        params.push(format!("fit-{}", fit));
    }
    if let Some(height) = opts.height.filter(|h| *h > 0) {
        params.push(format!("height-{}", height));
    }
    if let Some(width) = opts.width.filter(|w| *w > 0) {
        params.push(format!("width-{}", width));
    }

    let params_segment = if params.is_empty() {
        String::new()
    } else {
        format!("{}/", params.join(","))
    };

    let extension = opts
        .format
        .map(|format| format!(".{}", format))
        .unwrap_or_default();

    Ok(format!(
        "{}/{}/{}{}{}",
        base_url.trim_end_matches('/'),
        client_id,
        params_segment,
        id,
        extension
    ))
}

/// Builds retrieval URLs against the CDN, resolving the client id per call.
#[derive(Debug, Clone)]
pub struct CdnUrlBuilder {
    base_url: String,
    client_ids: ClientIdResolver,
}

impl Default for CdnUrlBuilder {
    fn default() -> Self {
        Self::new(ClientIdResolver::default())
    }
}

impl CdnUrlBuilder {
    pub fn new(client_ids: ClientIdResolver) -> Self {
        Self {
            base_url: DEFAULT_CDN_URL.to_string(),
            client_ids,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn build_url(&self, id: &str, client_id: Option<&str>, opts: &UrlOptions) -> Result<String> {
        if id.is_empty() {
            return build_url(&self.base_url, id, "", opts);
        }
        let client_id = self.client_ids.resolve(client_id, "getUrl")?;
        build_url(&self.base_url, id, &client_id, opts)
    }
}
