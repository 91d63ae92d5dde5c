//! Tile loading layer.
//!
//! This module turns a tile coordinate into image bytes, serving from a
//! content-addressed disk cache when it can and from the map service when it
//! cannot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Display surface              │
//! │     (WmsTileOverlay::load_tile)         │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              TileService                │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ TileRequest  │  │ TileCacheStore  │  │
//! │  │ (bbox → URL) │  │ (URL → file)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ miss
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        TileFetcher (HTTP GET)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileService`]: cache-or-fetch orchestration
//! - [`WmsTileOverlay`]: an [`OverlayConfig`] bound to a service
//! - [`TileCacheStore`]: URL-hash keyed files under an injected root
//! - [`TileRequest`]: template URL plus `&BBOX=` extent
//! - [`WmsParams`]: builds `GetMap` templates
//!
//! # Example
//!
//! ```
//! use wms_tile_engine::coord::TileCoordinate;
//! use wms_tile_engine::tile::{OverlayConfig, TileCacheStore, DEFAULT_CACHE_FOLDER};
//!
//! let overlay = OverlayConfig::new("https://maps.example.com/wms?LAYERS=a", true);
//! let url = overlay.request_for(TileCoordinate::new(5, 3, 4)).url();
//!
//! let store = TileCacheStore::new("/var/lib/tiles");
//! let path = store.path_for(&url, DEFAULT_CACHE_FOLDER);
//! assert!(path.starts_with("/var/lib/tiles/TILE_CACHE"));
//! ```

mod format;
mod overlay;
mod request;
mod service;
mod store;

pub use format::{content_type_for, detect_image_format, ImageFormat, FALLBACK_CONTENT_TYPE};
pub use overlay::{
    clamp_opacity, is_valid_opacity, OverlayConfig, OverlayKind, RendererKind, WmsParams,
    DEFAULT_OPACITY, MAX_OPACITY, MIN_OPACITY,
};
pub use request::TileRequest;
pub use service::{TileResponse, TileService, WmsTileOverlay};
pub use store::{cache_key_hash, TileCacheStore, CACHE_HASH_LEN, DEFAULT_CACHE_FOLDER};
