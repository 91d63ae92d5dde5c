//! Configuration management for the WMS tile engine.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap, with one subcommand per mode
//! - Environment variables with `WMS_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use wms_tile_engine::config::{Cli, Command};
//!
//! match Cli::parse().into_command() {
//!     Command::Serve(config) => println!("Listening on {}", config.bind_address()),
//!     Command::Fetch(config) => println!("Fetching {:?}", config.tile.coordinate()),
//!     Command::Inspect(config) => println!("Inspecting {:?}", config.tile.coordinate()),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `WMS_BASE_URL` - Full WMS template URL (everything except `BBOX`)
//! - `WMS_ENDPOINT` - WMS endpoint, used with `WMS_LAYERS` to build a template
//! - `WMS_LAYERS` - Comma-separated layer names
//! - `WMS_STYLES` - Comma-separated style names (default: empty)
//! - `WMS_PROJECTED` - Request Mercator meters instead of degrees (default: true)
//! - `WMS_OPACITY` - Overlay opacity in `[0, 1]` (default: 1.0)
//! - `WMS_CACHE_ROOT` - Persistent storage root (default: ./tile-data)
//! - `WMS_CACHE_FOLDER` - Cache folder under the root (default: TILE_CACHE)
//! - `WMS_HOST` - Server bind address (default: 0.0.0.0)
//! - `WMS_PORT` - Server port (default: 3000)
//! - `WMS_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `WMS_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::coord::TileCoordinate;
use crate::server::DEFAULT_CACHE_MAX_AGE;
use crate::tile::{
    is_valid_opacity, OverlayConfig, TileCacheStore, WmsParams, DEFAULT_CACHE_FOLDER,
    DEFAULT_OPACITY,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default persistent storage root.
pub const DEFAULT_CACHE_ROOT: &str = "./tile-data";

// =============================================================================
// CLI Arguments
// =============================================================================

/// WMS Tile Engine - cache-or-fetch loader for WMS map overlays.
///
/// Computes the geographic extent of each tile, requests it from a WMS
/// service and keeps a content-addressed copy on disk.
#[derive(Parser, Debug, Clone)]
#[command(name = "wms-tile-engine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve overlay tiles over HTTP.
    Serve(ServeConfig),

    /// Load a single tile through the cache.
    Fetch(FetchConfig),

    /// Show the extent, URL and cache entry of a tile without loading it.
    Inspect(InspectConfig),
}

// =============================================================================
// Overlay Arguments
// =============================================================================

/// Overlay settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct OverlayArgs {
    /// Full WMS template URL, including every parameter except BBOX.
    #[arg(long, env = "WMS_BASE_URL", conflicts_with = "wms_endpoint")]
    pub base_url: Option<String>,

    /// WMS endpoint to build a GetMap template for (requires --layers).
    #[arg(long, env = "WMS_ENDPOINT")]
    pub wms_endpoint: Option<String>,

    /// Layers for the built template.
    #[arg(long, env = "WMS_LAYERS")]
    pub layers: Option<String>,

    /// Styles for the built template.
    #[arg(long, default_value = "", env = "WMS_STYLES")]
    pub styles: String,

    /// Request extents in Mercator meters instead of degrees.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "WMS_PROJECTED")]
    pub projected: bool,

    /// Overlay opacity (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_OPACITY, env = "WMS_OPACITY")]
    pub opacity: f32,

    /// Persistent storage root the cache folder lives under.
    #[arg(long, default_value = DEFAULT_CACHE_ROOT, env = "WMS_CACHE_ROOT")]
    pub cache_root: PathBuf,

    /// Cache folder name under the storage root.
    #[arg(long, default_value = DEFAULT_CACHE_FOLDER, env = "WMS_CACHE_FOLDER")]
    pub cache_folder: String,
}

impl OverlayArgs {
    /// Validate the overlay settings and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.base_url, &self.wms_endpoint) {
            (None, None) => {
                return Err(
                    "No WMS service configured. Set --base-url or WMS_BASE_URL, \
                     or --wms-endpoint with --layers"
                        .to_string(),
                );
            }
            (Some(base_url), _) if base_url.trim().is_empty() => {
                return Err("base_url must not be empty".to_string());
            }
            (None, Some(_)) if self.layers.as_deref().map_or(true, str::is_empty) => {
                return Err("--wms-endpoint requires --layers or WMS_LAYERS".to_string());
            }
            _ => {}
        }

        if !is_valid_opacity(self.opacity) {
            return Err("opacity must be between 0.0 and 1.0".to_string());
        }

        if self.cache_folder.is_empty() || self.cache_folder.contains(['/', '\\']) {
            return Err("cache_folder must be a single non-empty path segment".to_string());
        }

        Ok(())
    }

    /// The URL template requests are built from.
    pub fn template(&self) -> Result<String, String> {
        if let Some(ref base_url) = self.base_url {
            return Ok(base_url.clone());
        }

        let endpoint = self
            .wms_endpoint
            .as_deref()
            .ok_or_else(|| "No WMS endpoint configured".to_string())?;
        let layers = self.layers.as_deref().unwrap_or_default();

        WmsParams::new(endpoint, layers)
            .with_styles(self.styles.as_str())
            .to_template()
            .map_err(|e| e.to_string())
    }

    /// Build the overlay configuration these arguments describe.
    pub fn overlay_config(&self) -> Result<OverlayConfig, String> {
        Ok(OverlayConfig::new(self.template()?, self.projected).with_opacity(self.opacity))
    }

    pub fn store(&self) -> TileCacheStore {
        TileCacheStore::new(self.cache_root.clone())
    }
}

/// Tile address shared by `fetch` and `inspect`.
#[derive(Args, Debug, Clone)]
pub struct TileArgs {
    #[arg(short, long)]
    pub zoom: u8,

    #[arg(short = 'x', long)]
    pub column: u32,

    #[arg(short = 'y', long)]
    pub row: u32,
}

impl TileArgs {
    pub fn coordinate(&self) -> Result<TileCoordinate, String> {
        TileCoordinate::checked(self.column, self.row, self.zoom).map_err(|e| e.to_string())
    }
}

// =============================================================================
// Serve Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[command(flatten)]
    pub overlay: OverlayArgs,

    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "WMS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "WMS_PORT")]
    pub port: u16,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "WMS_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "WMS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.overlay.validate()?;

        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Fetch Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct FetchConfig {
    #[command(flatten)]
    pub overlay: OverlayArgs,

    #[command(flatten)]
    pub tile: TileArgs,

    /// Write the tile bytes to this file instead of printing a summary.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl FetchConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.overlay.validate()?;
        self.tile.coordinate()?;
        Ok(())
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    #[command(flatten)]
    pub overlay: OverlayArgs,

    #[command(flatten)]
    pub tile: TileArgs,

    /// Map scale (screen points per map point) to report the zoom level for.
    #[arg(long)]
    pub scale: Option<f64>,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.overlay.validate()?;
        self.tile.coordinate()?;

        if let Some(scale) = self.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err("scale must be a positive number".to_string());
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
