use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use super::TileFetcher;
use crate::error::FetchError;

/// User-Agent sent with every tile request. Some map services reject
/// requests without one.
pub const USER_AGENT: &str = concat!("wms-tile-engine/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of `TileFetcher` backed by a shared reqwest client.
///
/// Each call is a single `GET`. No authentication headers are added and no
/// timeout is configured; callers that need bounded latency wrap the future.
#[derive(Clone)]
pub struct HttpTileFetcher {
    client: Client,
}

impl HttpTileFetcher {
    /// Create a fetcher with a fresh connection pool.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client (shared pool, custom TLS, proxies).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TileFetcher for HttpTileFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed =
            url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        debug!("fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
