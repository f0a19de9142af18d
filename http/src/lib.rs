//! # Surveyor HTTP
//!
//! Fetches a form catalog over HTTP. The endpoint answers a GET with the
//! catalog document `{"record": [...]}`.

use async_trait::async_trait;
use std::time::Duration;
use surveyor_core::model::Catalog;
use surveyor_core::source::{FormSource, SourceError};
use tracing::Instrument;

/// Hosted catalog used when nothing else is configured.
pub const DEFAULT_FORM_URL: &str = "https://api.jsonbin.io/v3/b/687374506063391d31aca23a";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the optional bin access key.
pub const MASTER_KEY_HEADER: &str = "X-Master-Key";

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub url: String,
    pub timeout: Duration,
    pub master_key: Option<String>,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FORM_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            master_key: None,
        }
    }
}

impl HttpSourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_master_key(mut self, key: impl Into<String>) -> Self {
        self.master_key = Some(key.into());
        self
    }
}

/// [`FormSource`] backed by one GET request per fetch.
#[derive(Debug, Clone)]
pub struct HttpFormSource {
    client: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpFormSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn get(&self) -> Result<Catalog, SourceError> {
        let mut request = self.client.get(&self.config.url);
        if let Some(key) = &self.config.master_key {
            request = request.header(MASTER_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Form source rejected request");
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let catalog = Catalog::from_json(&body)?;
        tracing::debug!(questions = catalog.len(), bytes = body.len(), "Decoded form");
        Ok(catalog)
    }
}

#[async_trait]
impl FormSource for HttpFormSource {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        let span = tracing::debug_span!("http_fetch", url = %self.config.url);
        self.get().instrument(span).await
    }
}
