//! Coordinate mapping for the Web Mercator tile pyramid.
//!
//! Converts tile-grid coordinates into the bounding boxes a WMS `GetMap`
//! request expects, either in geographic degrees or in projected Mercator
//! meters.
//!
//! ```text
//!   TileCoordinate { column, row, zoom }
//!            │
//!            ▼
//!   longitude_of_column / latitude_of_row      (degrees)
//!            │
//!            ▼  projected?
//!   mercator_x / mercator_y                    (meters)
//!            │
//!            ▼
//!   BoundingBox { west, south, east, north }
//! ```
//!
//! # Example
//!
//! ```
//! use wms_tile_engine::coord::{bounding_box_of, TileCoordinate};
//!
//! let bbox = bounding_box_of(TileCoordinate::new(0, 0, 0), false);
//! assert_eq!(bbox.west, -180.0);
//! assert_eq!(bbox.east, 180.0);
//! ```

mod mercator;
mod types;

pub use mercator::{
    bounding_box_of, latitude_of_row, longitude_of_column, mercator_x, mercator_y, zoom_level,
};
pub use types::{
    tiles_per_side, BoundingBox, TileCoordinate, MAX_ZOOM, MERCATOR_HALF_EXTENT, MIN_ZOOM,
    TILE_SIZE, WORLD_WIDTH_POINTS,
};
