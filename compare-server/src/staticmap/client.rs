//! Static map HTTP client.

use std::time::Duration;

use crate::compare::MapRenderer;

/// Default base URL for the static maps API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Requested image size in pixels.
pub const MAP_WIDTH_PX: u32 = 600;
pub const MAP_HEIGHT_PX: u32 = 400;

/// Errors from the static map client.
#[derive(Debug, thiserror::Error)]
pub enum StaticMapError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response was not an image
    #[error("unexpected content type: {0}")]
    NotAnImage(String),
}

/// Configuration for the static map client.
#[derive(Debug, Clone)]
pub struct StaticMapConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StaticMapConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 8,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Static map API client.
#[derive(Debug, Clone)]
pub struct StaticMapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StaticMapClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StaticMapConfig) -> Result<Self, StaticMapError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch a baseline JPEG of the route with start and destination markers.
    pub async fn fetch_map(
        &self,
        encoded_path: &str,
        origin_label: &str,
        destination_label: &str,
    ) -> Result<Vec<u8>, StaticMapError> {
        let params = map_query(encoded_path, origin_label, destination_label);
        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StaticMapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(StaticMapError::NotAnImage(content_type));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Query parameters for one map, without the key.
fn map_query(
    encoded_path: &str,
    origin_label: &str,
    destination_label: &str,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("size", format!("{MAP_WIDTH_PX}x{MAP_HEIGHT_PX}")),
        ("format", "jpg-baseline".to_string()),
        ("markers", format!("color:green|label:S|{origin_label}")),
        ("markers", format!("color:red|label:Z|{destination_label}")),
    ];
    if !encoded_path.is_empty() {
        params.push(("path", format!("color:0x0000ff|weight:5|enc:{encoded_path}")));
    }
    params
}

impl MapRenderer for StaticMapClient {
    async fn render_map(
        &self,
        encoded_path: &str,
        origin_label: &str,
        destination_label: &str,
    ) -> Result<Vec<u8>, StaticMapError> {
        self.fetch_map(encoded_path, origin_label, destination_label)
            .await
    }
}
