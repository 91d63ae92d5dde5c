//! Tile Service for cache-or-fetch tile loading.
//!
//! The TileService is the main entry point for tile loads. Each load is an
//! independent unit of work:
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │  build URL from bbox     │
//!                 │  resolve cache path      │
//!                 └────────────┬─────────────┘
//!                              │ exists?
//!              ┌───────────────┴───────────────┐
//!              ▼ yes                           ▼ no
//!      ┌───────────────┐              ┌─────────────────┐
//!      │  read entry   │              │   HTTP GET      │
//!      │  (CacheHit)   │              │   (Fetching)    │
//!      └───────┬───────┘              └───┬─────────┬───┘
//!              │                      ok  │         │ err
//!              │                          ▼         │
//!              │                 ┌──────────────┐   │
//!              │                 │ write entry  │   │
//!              │                 │ (best effort)│   │
//!              │                 └──────┬───────┘   │
//!              ▼                        ▼           ▼
//!            Done                     Done        Done
//! ```
//!
//! There is no shared mutable state besides the cache directory, so any number
//! of loads may run concurrently. Identical concurrent misses each fetch and
//! each write the same entry; the last rename wins.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::coord::TileCoordinate;
use crate::error::TileError;
use crate::io::TileFetcher;

use super::overlay::{OverlayConfig, OverlayKind, RendererKind};
use super::store::{TileCacheStore, DEFAULT_CACHE_FOLDER};

// =============================================================================
// Tile Response
// =============================================================================

/// Response from a tile load.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// Raw image bytes as served by the map service
    pub data: Bytes,

    /// Whether the bytes came from the disk cache
    pub cache_hit: bool,
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service that loads tiles from the disk cache or the network.
///
/// # Type Parameters
///
/// * `F` - The fetcher used on cache misses (e.g., [`crate::io::HttpTileFetcher`])
///
/// # Example
///
/// ```ignore
/// use wms_tile_engine::coord::TileCoordinate;
/// use wms_tile_engine::io::HttpTileFetcher;
/// use wms_tile_engine::tile::{OverlayConfig, TileCacheStore, TileService};
///
/// let service = TileService::new(HttpTileFetcher::new()?, TileCacheStore::new("/var/lib/tiles"));
/// let overlay = OverlayConfig::new("https://maps.example.com/wms?LAYERS=a&SRS=EPSG:900913", true);
///
/// let response = service.load_tile(TileCoordinate::new(5, 3, 4), &overlay).await?;
/// println!("{} bytes, cache hit: {}", response.data.len(), response.cache_hit);
/// ```
pub struct TileService<F: TileFetcher> {
    /// Fetcher for cache misses
    fetcher: Arc<F>,

    /// Disk cache
    store: TileCacheStore,

    /// Folder name under the store root
    cache_folder: String,
}

impl<F: TileFetcher> TileService<F> {
    /// Create a service caching under the default `TILE_CACHE` folder.
    pub fn new(fetcher: F, store: TileCacheStore) -> Self {
        Self::with_shared_fetcher(Arc::new(fetcher), store)
    }

    /// Create a service with a fetcher shared with other components.
    pub fn with_shared_fetcher(fetcher: Arc<F>, store: TileCacheStore) -> Self {
        Self {
            fetcher,
            store,
            cache_folder: DEFAULT_CACHE_FOLDER.to_string(),
        }
    }

    /// Use a different cache folder name under the store root.
    pub fn with_cache_folder(mut self, folder: impl Into<String>) -> Self {
        self.cache_folder = folder.into();
        self
    }

    /// Load one tile, serving from the disk cache when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A cache entry exists but cannot be read ([`TileError::CacheReadFailed`]);
    ///   the network is not consulted in that case
    /// - The network fetch fails ([`TileError::Network`]); nothing is written
    ///
    /// A cache folder that cannot be created or an entry that cannot be
    /// written is logged and otherwise ignored: the fetched bytes are still
    /// returned.
    pub async fn load_tile(
        &self,
        coordinate: TileCoordinate,
        overlay: &OverlayConfig,
    ) -> Result<TileResponse, TileError> {
        let url = overlay.request_for(coordinate).url();

        let path = match self.store.resolve_cache_path(&url, &self.cache_folder).await {
            Ok(path) => path,
            Err(e) if !e.is_terminal() => {
                warn!("Tile cache unavailable, loading without it: {}", e);
                self.store.path_for(&url, &self.cache_folder)
            }
            Err(e) => return Err(e),
        };

        if self.store.exists(&path).await {
            let data = self.store.read(&path).await?;
            debug!(
                "cache hit for tile {:?}: {} bytes from {}",
                coordinate,
                data.len(),
                path.display()
            );
            return Ok(TileResponse {
                data,
                cache_hit: true,
            });
        }

        debug!("cache miss for tile {:?}, fetching {}", coordinate, url);
        let data = self.fetcher.fetch(&url).await.map_err(|e| {
            warn!("Error downloading tile {:?}: {}", coordinate, e);
            TileError::from(e)
        })?;

        match self.store.write(&path, &data).await {
            Ok(()) => {}
            Err(e) if !e.is_terminal() => warn!("Tile {:?} not cached: {}", coordinate, e),
            Err(e) => return Err(e),
        }

        Ok(TileResponse {
            data,
            cache_hit: false,
        })
    }

    /// Cache file a tile of `overlay` resolves to, without touching the disk.
    pub fn cache_path(&self, coordinate: TileCoordinate, overlay: &OverlayConfig) -> PathBuf {
        let url = overlay.request_for(coordinate).url();
        self.store.path_for(&url, &self.cache_folder)
    }

    /// Get a reference to the disk cache.
    pub fn store(&self) -> &TileCacheStore {
        &self.store
    }

    /// The cache folder name under the store root.
    pub fn cache_folder(&self) -> &str {
        &self.cache_folder
    }

    /// Get a reference to the fetcher.
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }
}

// =============================================================================
// WMS Tile Overlay
// =============================================================================

/// A configured overlay bound to a tile service.
///
/// This is what the display surface holds: it calls [`Self::load_tile`] with
/// a coordinate and never sees URLs or cache paths. Changing the service URL
/// means building a new overlay with [`Self::with_config`].
pub struct WmsTileOverlay<F: TileFetcher> {
    config: Arc<OverlayConfig>,
    service: Arc<TileService<F>>,
}

impl<F: TileFetcher> WmsTileOverlay<F> {
    pub fn new(config: OverlayConfig, service: Arc<TileService<F>>) -> Self {
        Self {
            config: Arc::new(config),
            service,
        }
    }

    /// A new overlay with a different configuration, sharing this one's service.
    pub fn with_config(&self, config: OverlayConfig) -> Self {
        Self::new(config, Arc::clone(&self.service))
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<TileService<F>> {
        &self.service
    }

    /// Renderer the display surface should pick for this overlay.
    pub fn renderer(&self) -> RendererKind {
        OverlayKind::Tile(&self.config).renderer()
    }

    /// Load one tile of this overlay.
    pub async fn load_tile(&self, coordinate: TileCoordinate) -> Result<TileResponse, TileError> {
        self.service.load_tile(coordinate, &self.config).await
    }
}

impl<F: TileFetcher + 'static> WmsTileOverlay<F> {
    /// Start a load on the runtime and return the channel its single result
    /// arrives on.
    ///
    /// Dropping the receiver discards the result; the load itself still runs
    /// to completion and may populate the cache.
    pub fn spawn_load_tile(
        &self,
        coordinate: TileCoordinate,
    ) -> oneshot::Receiver<Result<TileResponse, TileError>> {
        let (tx, rx) = oneshot::channel();
        let overlay = self.clone();

        tokio::spawn(async move {
            let result = overlay.load_tile(coordinate).await;
            let _ = tx.send(result);
        });

        rx
    }
}

impl<F: TileFetcher> Clone for WmsTileOverlay<F> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            service: Arc::clone(&self.service),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
