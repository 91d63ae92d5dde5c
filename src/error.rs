use thiserror::Error;

/// Errors from the outbound tile fetch (one HTTP GET against the map service)
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The resolved request URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read to completion
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Errors that can occur while loading a tile
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Cache folder could not be provisioned; loads continue without a cache
    #[error("Failed to create cache directory {path}: {message}")]
    DirectoryCreationFailed { path: String, message: String },

    /// A cache entry exists but could not be read
    #[error("Failed to read cached tile {path}: {message}")]
    CacheReadFailed { path: String, message: String },

    /// The network fetch failed
    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    /// Fetched bytes could not be persisted to the cache
    #[error("Failed to write cached tile {path}: {message}")]
    CacheWriteFailed { path: String, message: String },

    /// Coordinate outside the tile pyramid (rejected at the boundary, never by the engine)
    #[error("Invalid tile coordinate: column {column}, row {row} at zoom {zoom}")]
    InvalidCoordinate { column: u32, row: u32, zoom: u8 },

    /// A tile path segment that does not parse as a number
    #[error("Invalid tile path segment {segment:?}: {message}")]
    InvalidTilePath { segment: String, message: String },
}

impl TileError {
    /// Whether this error ends the tile load, as opposed to degrading the cache.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            TileError::DirectoryCreationFailed { .. } | TileError::CacheWriteFailed { .. }
        )
    }
}
