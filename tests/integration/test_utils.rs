//! Test utilities for integration tests.
//!
//! This module provides a tracking mock fetcher and helpers for building
//! tile services over throwaway storage roots.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use wms_tile_engine::error::FetchError;
use wms_tile_engine::io::TileFetcher;
use wms_tile_engine::tile::{OverlayConfig, TileCacheStore, TileService, WmsTileOverlay};

/// Template used by most tests.
pub const TEMPLATE: &str =
    "https://maps.example.com/geoserver/wms?LAYERS=warnings&STYLES=&SERVICE=WMS&SRS=EPSG:900913";

/// Smallest byte string recognized as a PNG.
pub const PNG_TILE: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

// =============================================================================
// Mock Fetcher with Request Tracking
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum FetchMode {
    /// Answer every request with [`PNG_TILE`]
    Succeed,

    /// Fail every request at the transport level
    Refuse,

    /// Answer every request with the given HTTP status
    Status(u16),
}

/// A mock fetcher that tracks every request it receives.
pub struct TrackingMockFetcher {
    mode: FetchMode,
    delay: Option<Duration>,
    request_count: Arc<AtomicUsize>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl TrackingMockFetcher {
    pub fn new() -> Self {
        Self::with_mode(FetchMode::Succeed)
    }

    pub fn with_mode(mode: FetchMode) -> Self {
        Self {
            mode,
            delay: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Hold every response for `delay` so concurrent loads overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub async fn get_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

impl Clone for TrackingMockFetcher {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            delay: self.delay,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl TileFetcher for TrackingMockFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.mode {
            FetchMode::Succeed => Ok(Bytes::from_static(PNG_TILE)),
            FetchMode::Refuse => Err(FetchError::Connection("connection refused".to_string())),
            FetchMode::Status(status) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Build an overlay over `root` whose fetcher is shared with the caller.
pub fn overlay_in(
    root: &Path,
    fetcher: &TrackingMockFetcher,
    config: OverlayConfig,
) -> WmsTileOverlay<TrackingMockFetcher> {
    let service = TileService::new(fetcher.clone(), TileCacheStore::new(root));
    WmsTileOverlay::new(config, Arc::new(service))
}

/// Visible files in the default cache folder under `root`.
pub fn cache_files(root: &Path) -> Vec<String> {
    let folder = root.join(wms_tile_engine::tile::DEFAULT_CACHE_FOLDER);
    let mut names: Vec<String> = match std::fs::read_dir(folder) {
        Ok(dir) => dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Every entry in the default cache folder, temporaries included.
pub fn all_cache_entries(root: &Path) -> usize {
    let folder = root.join(wms_tile_engine::tile::DEFAULT_CACHE_FOLDER);
    std::fs::read_dir(folder).map(|dir| dir.count()).unwrap_or(0)
}
