//! The async trait every tile body source implements.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

/// Trait for retrieving the body behind a fully-resolved tile URL.
///
/// Implementations issue exactly one request per call: no retries, no
/// timeouts, no de-duplication. Completion is signaled by the returned
/// future, never by blocking the caller.
#[async_trait]
pub trait TileFetcher: Send + Sync {
    /// Fetch the full response body for `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<T: TileFetcher + ?Sized> TileFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        (**self).fetch(url).await
    }
}
