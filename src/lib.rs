//! # WMS Tile Engine
//!
//! A cache-or-fetch tile loader for WMS (Web Map Service) overlays.
//!
//! Display surfaces ask for tiles by `(column, row, zoom)`. The engine turns
//! each coordinate into a geographic extent, appends it to the overlay's
//! WMS URL template and returns the image bytes, serving them from a
//! content-addressed disk cache when the same request was answered before.
//!
//! ## Features
//!
//! - **Tile math**: Web Mercator tile bounds in degrees or projected meters,
//!   plus the scale-to-zoom snapping used by map views
//! - **Disk cache**: One file per request URL, named by a hash of the URL,
//!   written atomically so concurrent loads never expose partial tiles
//! - **Graceful degradation**: An unusable cache never prevents a load
//! - **HTTP proxy**: Optional axum server exposing `/tiles/{z}/{x}/{y}`
//!
//! ## Architecture
//!
//! - [`coord`] - Coordinate mapping and zoom-level selection
//! - [`io`] - Outbound fetch abstraction and its HTTP implementation
//! - [`tile`] - Cache store, overlay configuration and the tile service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wms_tile_engine::{
//!     HttpTileFetcher, OverlayConfig, TileCacheStore, TileCoordinate, TileService,
//!     WmsTileOverlay,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = TileService::new(HttpTileFetcher::new()?, TileCacheStore::new("./tile-data"));
//!     let overlay = WmsTileOverlay::new(
//!         OverlayConfig::new("https://maps.example.com/wms?LAYERS=warnings&SRS=EPSG:900913", true),
//!         Arc::new(service),
//!     );
//!
//!     let tile = overlay.load_tile(TileCoordinate::new(5, 3, 4)).await?;
//!     println!("{} bytes (cache hit: {})", tile.data.len(), tile.cache_hit);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod io;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, FetchConfig, InspectConfig, OverlayArgs, ServeConfig, TileArgs};
pub use coord::{bounding_box_of, zoom_level, BoundingBox, TileCoordinate, MAX_ZOOM, TILE_SIZE};
pub use error::{FetchError, TileError};
pub use io::{HttpTileFetcher, TileFetcher};
pub use server::{create_router, AppState, RouterConfig};
pub use tile::{
    OverlayConfig, RendererKind, TileCacheStore, TileRequest, TileResponse, TileService,
    WmsParams, WmsTileOverlay,
};
