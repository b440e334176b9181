use std::future::Future;
use tracing::{debug, info};

use crate::error::{InjectError, Result};

/// Read-only source of documentation pages, keyed by URL.
pub trait DocumentationSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches documentation pages over HTTP(S).
#[derive(Clone)]
pub struct HttpDocs {
    client: reqwest::Client,
}

impl HttpDocs {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("amp-inject/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InjectError::Fetch {
                url: String::new(),
                reason: format!("could not build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl DocumentationSource for HttpDocs {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching documentation page {}", url);
        let fail = |reason: String| InjectError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self.client.get(url).send().await.map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("HTTP error: {}", response.status())));
        }

        let body = response.text().await.map_err(|e| fail(e.to_string()))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
