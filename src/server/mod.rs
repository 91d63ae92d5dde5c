//! HTTP tile proxy.
//!
//! Exposes the tile loader to display surfaces that speak HTTP: each
//! `GET /tiles/{zoom}/{column}/{row}` is one `load_tile` call.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              GET /tiles/{zoom}/{column}/{row}                   │
//! │                                                                 │
//! │  ┌─────────────────────────┐  ┌─────────────────────────────┐   │
//! │  │        handlers         │  │           routes            │   │
//! │  │ (validate, load, sniff) │  │ (CORS, tracing, state)      │   │
//! │  └─────────────────────────┘  └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, overlay_handler, tile_handler, AppState, ErrorResponse, HealthResponse,
    OverlayResponse, TilePathParams, DEFAULT_CACHE_MAX_AGE,
};
pub use routes::{create_router, RouterConfig};
