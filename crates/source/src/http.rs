use std::time::Duration;

use gazette_engine::{Document, DocumentSource, EngineError, Result};
use log::debug;
use reqwest::blocking::Client;

use crate::json::decode_documents;

/// Applied to the whole request, connect through body.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Document list served over HTTP, fetched with one GET per refresh.
///
/// The body takes the same shapes as a metadata file. A non-2xx status is
/// a fetch failure.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Source(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EngineError::Source(format!("GET {}: {e}", self.url)))?;

        let body = response
            .bytes()
            .map_err(|e| EngineError::Source(format!("reading body of {}: {e}", self.url)))?;
        debug!("fetched {} bytes from {}", body.len(), self.url);

        decode_documents(&body).map_err(|e| EngineError::Decode(format!("{}: {e}", self.url)))
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
