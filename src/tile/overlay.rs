//! Overlay configuration supplied by the display surface.
//!
//! An overlay is configured once and never mutated. When the service URL
//! changes the display surface builds a new [`OverlayConfig`] instead.

use serde::Serialize;

use crate::coord::{TileCoordinate, TILE_SIZE};
use crate::error::FetchError;

use super::request::TileRequest;

/// Default overlay opacity (fully opaque).
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Minimum overlay opacity.
pub const MIN_OPACITY: f32 = 0.0;

/// Maximum overlay opacity.
pub const MAX_OPACITY: f32 = 1.0;

/// Check whether an opacity value is in `[0, 1]`.
pub fn is_valid_opacity(opacity: f32) -> bool {
    (MIN_OPACITY..=MAX_OPACITY).contains(&opacity)
}

/// Clamp an opacity value into `[0, 1]`. NaN falls back to the default.
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        DEFAULT_OPACITY
    } else {
        opacity.clamp(MIN_OPACITY, MAX_OPACITY)
    }
}

// =============================================================================
// Overlay Configuration
// =============================================================================

/// Immutable configuration of one tile overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayConfig {
    /// Service endpoint plus every query parameter except `BBOX`
    pub base_url_template: String,

    /// Request extents in Mercator meters instead of degrees
    pub use_projected: bool,

    /// Alpha applied by the renderer, in `[0, 1]`
    pub opacity: f32,

    /// Whether the overlay fully covers the base map
    pub can_replace_map_content: bool,
}

impl OverlayConfig {
    /// Create an opaque overlay that draws over the base map.
    pub fn new(base_url_template: impl Into<String>, use_projected: bool) -> Self {
        Self {
            base_url_template: base_url_template.into(),
            use_projected,
            opacity: DEFAULT_OPACITY,
            can_replace_map_content: false,
        }
    }

    /// Set the opacity, clamped into `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = clamp_opacity(opacity);
        self
    }

    pub fn with_can_replace_map_content(mut self, can_replace: bool) -> Self {
        self.can_replace_map_content = can_replace;
        self
    }

    /// Build the request for one tile of this overlay.
    pub fn request_for(&self, coordinate: TileCoordinate) -> TileRequest {
        TileRequest::new(
            self.base_url_template.as_str(),
            coordinate,
            self.use_projected,
        )
    }
}

// =============================================================================
// Renderer Selection
// =============================================================================

/// Renderer the display surface should use for an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RendererKind {
    /// Raster tile renderer drawn at the given alpha
    Tile { alpha: f32 },

    /// Whatever the surface draws for overlays that are not tile sources
    Fallback,
}

/// Overlays as seen by the display surface when it picks a renderer.
#[derive(Debug, Clone, Copy)]
pub enum OverlayKind<'a> {
    Tile(&'a OverlayConfig),
    Other,
}

impl OverlayKind<'_> {
    pub fn renderer(&self) -> RendererKind {
        match self {
            OverlayKind::Tile(config) => RendererKind::Tile {
                alpha: config.opacity,
            },
            OverlayKind::Other => RendererKind::Fallback,
        }
    }
}

// =============================================================================
// WMS Template
// =============================================================================

/// Parameters of a WMS `GetMap` template.
///
/// Defaults match a GeoServer overlay in spherical Mercator: version 1.3,
/// `EPSG:900913`, 256-pixel transparent `image/png8` tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsParams {
    pub endpoint: String,
    pub layers: String,
    pub styles: String,
    pub version: String,
    pub srs: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub transparent: bool,
}

impl WmsParams {
    pub fn new(endpoint: impl Into<String>, layers: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            layers: layers.into(),
            styles: String::new(),
            version: "1.3".to_string(),
            srs: "EPSG:900913".to_string(),
            width: TILE_SIZE as u32,
            height: TILE_SIZE as u32,
            format: "image/png8".to_string(),
            transparent: true,
        }
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Render the template URL. Query parameters already present on the
    /// endpoint are kept ahead of the `GetMap` parameters.
    pub fn to_template(&self) -> Result<String, FetchError> {
        let mut url = url::Url::parse(&self.endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;

        url.query_pairs_mut()
            .append_pair("LAYERS", &self.layers)
            .append_pair("STYLES", &self.styles)
            .append_pair("SERVICE", "WMS")
            .append_pair("VERSION", &self.version)
            .append_pair("REQUEST", "GetMap")
            .append_pair("SRS", &self.srs)
            .append_pair("width", &self.width.to_string())
            .append_pair("height", &self.height.to_string())
            .append_pair("format", &self.format)
            .append_pair("transparent", if self.transparent { "true" } else { "false" });

        Ok(url.to_string())
    }
}
