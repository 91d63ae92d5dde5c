//! Tile coordinate and bounding box types.

use serde::Serialize;

use crate::error::TileError;

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Lowest zoom level of the tile pyramid.
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level of the tile pyramid.
pub const MAX_ZOOM: u8 = 25;

/// Width of the rendering surface's world in map points (2^28).
///
/// At a scale factor of 1.0 one map point is one tile pixel, so the world is
/// 2^20 tiles wide and the base zoom level is 20.
pub const WORLD_WIDTH_POINTS: f64 = 268_435_456.0;

/// Half the circumference of the Web Mercator sphere in meters.
pub const MERCATOR_HALF_EXTENT: f64 = 20_037_508.34;

// =============================================================================
// TileCoordinate
// =============================================================================

/// One cell of the Web Mercator tile pyramid.
///
/// Rows grow southward from the top of the map, columns grow eastward from
/// the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileCoordinate {
    /// Tile column (0-indexed from the west)
    pub column: u32,

    /// Tile row (0-indexed from the north)
    pub row: u32,

    /// Zoom level
    pub zoom: u8,
}

impl TileCoordinate {
    /// Create a coordinate without validation.
    ///
    /// The mapping functions extrapolate out-of-range columns and rows, so
    /// callers facing untrusted input should use [`TileCoordinate::checked`].
    pub const fn new(column: u32, row: u32, zoom: u8) -> Self {
        Self { column, row, zoom }
    }

    /// Create a coordinate, rejecting zoom levels above [`MAX_ZOOM`] and
    /// columns or rows outside `[0, 2^zoom)`.
    pub fn checked(column: u32, row: u32, zoom: u8) -> Result<Self, TileError> {
        let coord = Self::new(column, row, zoom);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(TileError::InvalidCoordinate { column, row, zoom })
        }
    }

    /// Whether the coordinate names a real tile.
    pub fn is_valid(&self) -> bool {
        if self.zoom > MAX_ZOOM {
            return false;
        }
        let tiles = tiles_per_side(self.zoom);
        u64::from(self.column) < tiles && u64::from(self.row) < tiles
    }
}

/// Number of tiles along one side of the grid at `zoom`.
pub fn tiles_per_side(zoom: u8) -> u64 {
    1u64 << zoom.min(63)
}

// =============================================================================
// BoundingBox
// =============================================================================

/// Extent of a tile, either in degrees or in Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The `BBOX` query value: `west,south,east,north`.
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
