//! Router configuration for the tile proxy.
//!
//! # Route Structure
//!
//! ```text
//! /health                          - Health check
//! /overlay                         - Overlay configuration
//! /tiles/{zoom}/{column}/{row}     - Tile endpoint
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wms_tile_engine::server::{create_router, RouterConfig};
//!
//! let router = create_router(overlay, RouterConfig::new().with_cache_max_age(86400));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, overlay_handler, tile_handler, AppState, DEFAULT_CACHE_MAX_AGE,
};
use crate::io::TileFetcher;
use crate::tile::WmsTileOverlay;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Any CORS origin, 1 hour max-age, tracing on.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router serving one overlay.
pub fn create_router<F>(overlay: WmsTileOverlay<F>, config: RouterConfig) -> Router
where
    F: TileFetcher + 'static,
{
    let app_state = AppState::with_cache_max_age(overlay, config.cache_max_age);
    let cors = build_cors_layer(&config);

    // {filename} captures both "{row}" and "{row}.png"
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/overlay", get(overlay_handler::<F>))
        .route("/tiles/{zoom}/{column}/{filename}", get(tile_handler::<F>))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}
