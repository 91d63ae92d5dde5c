//! HTTP request handlers for the tile proxy.
//!
//! # Endpoints
//!
//! - `GET /tiles/{zoom}/{column}/{row}` - Serve a tile (row may carry an extension)
//! - `GET /overlay` - Overlay configuration for renderer selection
//! - `GET /health` - Health check endpoint

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::coord::TileCoordinate;
use crate::error::{FetchError, TileError};
use crate::io::TileFetcher;
use crate::tile::{content_type_for, OverlayConfig, RendererKind, WmsTileOverlay};

/// Default `Cache-Control` max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the overlay being served.
pub struct AppState<F: TileFetcher> {
    /// Overlay whose tiles are served
    pub overlay: WmsTileOverlay<F>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,
}

impl<F: TileFetcher> AppState<F> {
    pub fn new(overlay: WmsTileOverlay<F>) -> Self {
        Self::with_cache_max_age(overlay, DEFAULT_CACHE_MAX_AGE)
    }

    pub fn with_cache_max_age(overlay: WmsTileOverlay<F>, cache_max_age: u32) -> Self {
        Self {
            overlay,
            cache_max_age,
        }
    }
}

impl<F: TileFetcher> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            overlay: self.overlay.clone(),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{zoom}/{column}/{filename}`
/// where filename is `{row}` or `{row}.{ext}`
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    pub zoom: u8,

    pub column: u32,

    /// Row with optional image extension (e.g., "3" or "3.png")
    pub filename: String,
}

impl TilePathParams {
    /// Parse the row from the filename, stripping any extension.
    pub fn row(&self) -> Result<u32, std::num::ParseIntError> {
        let row = match self.filename.split_once('.') {
            Some((stem, _)) => stem,
            None => &self.filename,
        };
        row.parse()
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_coordinate", "upstream_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Overlay description for the display surface.
#[derive(Debug, Serialize)]
pub struct OverlayResponse {
    #[serde(flatten)]
    pub config: OverlayConfig,

    /// Renderer to use: "tile" for every overlay served here
    pub renderer: String,
}

// =============================================================================
// Error Conversion
// =============================================================================

/// Convert TileError to HTTP response.
///
/// Upstream failures become 502 so the display surface can tell them apart
/// from its own bad requests and show a placeholder or retry.
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            TileError::InvalidCoordinate { .. } => (StatusCode::BAD_REQUEST, "invalid_coordinate"),
            TileError::InvalidTilePath { .. } => (StatusCode::BAD_REQUEST, "invalid_path"),
            TileError::Network(FetchError::Status { .. }) => {
                (StatusCode::BAD_GATEWAY, "upstream_status")
            }
            TileError::Network(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            TileError::CacheReadFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_read_failed")
            }
            TileError::DirectoryCreationFailed { .. } | TileError::CacheWriteFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_error")
            }
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{zoom}/{column}/{row}`
///
/// # Response
///
/// - `200 OK`: tile bytes, `Content-Type` sniffed from the payload
/// - `400 Bad Request`: coordinate outside the tile pyramid
/// - `502 Bad Gateway`: the map service could not be reached or refused
/// - `500 Internal Server Error`: unreadable cache entry
///
/// # Headers
///
/// - `Cache-Control: public, max-age={cache_max_age}`
/// - `X-Tile-Cache-Hit: true|false`
pub async fn tile_handler<F: TileFetcher + 'static>(
    State(state): State<AppState<F>>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, TileError> {
    let row = params.row().map_err(|e| TileError::InvalidTilePath {
        segment: params.filename.clone(),
        message: e.to_string(),
    })?;
    let coordinate = TileCoordinate::checked(params.column, row, params.zoom)?;

    let response = state.overlay.load_tile(coordinate).await?;
    debug!(
        "served tile {:?} ({} bytes, cache hit: {})",
        coordinate,
        response.data.len(),
        response.cache_hit
    );

    let content_type = content_type_for(&response.data);
    let http_response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.cache_max_age),
            ),
        ],
        [("X-Tile-Cache-Hit", response.cache_hit.to_string())],
        response.data,
    )
        .into_response();

    Ok(http_response)
}

/// Handle overlay description requests.
///
/// # Endpoint
///
/// `GET /overlay`
pub async fn overlay_handler<F: TileFetcher + 'static>(
    State(state): State<AppState<F>>,
) -> Json<OverlayResponse> {
    let renderer = match state.overlay.renderer() {
        RendererKind::Tile { .. } => "tile",
        RendererKind::Fallback => "fallback",
    };

    Json(OverlayResponse {
        config: state.overlay.config().clone(),
        renderer: renderer.to_string(),
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
