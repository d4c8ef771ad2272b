//! HTTP client for the artworks endpoint of the catalog API.
//!
//! URL building, status classification and body decoding are shared with the
//! async client in `browser-ui`; only the transport differs.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::core::pagination::PageWindow;
use crate::core::types::{ARTWORK_FIELDS, ArtworksPage};
use crate::io::config::BrowserConfig;
use crate::io::source::{DataSource, FetchError};

/// Build `{api_base}?page=..&limit=..&fields=..` for one page.
pub fn page_url(api_base: &str, window: &PageWindow) -> Result<Url, FetchError> {
    let fields = ARTWORK_FIELDS.join(",");
    Url::parse_with_params(
        api_base,
        &[
            ("page", window.page().to_string()),
            ("limit", window.rows_per_page().to_string()),
            ("fields", fields),
        ],
    )
    .map_err(|err| FetchError::InvalidUrl(err.to_string()))
}

/// Map a non-success status to `FetchError::Api`.
pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    Err(FetchError::Api {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
    })
}

/// Decode a response body into a page.
pub fn decode_page(body: &[u8]) -> Result<ArtworksPage, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

/// Blocking catalog client used by the terminal browser.
pub struct ArticClient {
    client: Client,
    api_base: String,
}

impl ArticClient {
    pub fn new(cfg: &BrowserConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.clone(),
        })
    }
}

impl DataSource for ArticClient {
    fn fetch_page(&self, window: &PageWindow) -> Result<ArtworksPage, FetchError> {
        let url = page_url(&self.api_base, window)?;
        debug!(%url, "fetching artworks page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;
        if let Err(err) = check_status(response.status()) {
            warn!(status = err.status(), page = window.page(), "artworks request failed");
            return Err(err);
        }

        let body = response.bytes()?;
        decode_page(&body)
    }
}
