//! Tile grid to geographic and Web Mercator conversions.
//!
//! All functions are pure. Inputs are assumed to be pre-validated; columns and
//! rows outside the grid extrapolate rather than clamp.

use std::f64::consts::PI;

use super::types::{
    BoundingBox, TileCoordinate, MERCATOR_HALF_EXTENT, TILE_SIZE, WORLD_WIDTH_POINTS,
};

/// Zoom level whose tile grid best matches a rendering scale factor.
///
/// Snaps `log2` of the scale to the nearest level; exact halves round toward
/// the higher zoom level. Never returns less than zero.
pub fn zoom_level(scale_factor: f64) -> u32 {
    let tiles_at_zoom0 = WORLD_WIDTH_POINTS / TILE_SIZE;
    let base_zoom = tiles_at_zoom0.log2();
    let zoom = (base_zoom + scale_factor.log2() + 0.5).floor();

    // f64::max drops NaN, so a non-positive scale lands on zero
    zoom.max(0.0) as u32
}

/// Longitude of the western edge of `column` at `zoom`, in degrees.
pub fn longitude_of_column(column: u64, zoom: u8) -> f64 {
    column as f64 / 2f64.powi(i32::from(zoom)) * 360.0 - 180.0
}

/// Latitude of the northern edge of `row` at `zoom`, in degrees.
pub fn latitude_of_row(row: u64, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * row as f64 / 2f64.powi(i32::from(zoom));
    180.0 / PI * (0.5 * (n.exp() - (-n).exp())).atan()
}

/// Web Mercator X in meters for a longitude in degrees.
pub fn mercator_x(longitude: f64) -> f64 {
    longitude * MERCATOR_HALF_EXTENT / 180.0
}

/// Web Mercator Y in meters for a latitude in degrees.
///
/// Diverges toward the poles; tile edges never reach them.
pub fn mercator_y(latitude: f64) -> f64 {
    let y = ((90.0 + latitude) * PI / 360.0).tan().ln() / (PI / 180.0);
    y * MERCATOR_HALF_EXTENT / 180.0
}

/// Extent of a tile, in degrees or (when `projected`) in Mercator meters.
pub fn bounding_box_of(coordinate: TileCoordinate, projected: bool) -> BoundingBox {
    let column = u64::from(coordinate.column);
    let row = u64::from(coordinate.row);
    let zoom = coordinate.zoom;

    let west = longitude_of_column(column, zoom);
    let east = longitude_of_column(column + 1, zoom);
    // rows count downward, latitudes upward
    let south = latitude_of_row(row + 1, zoom);
    let north = latitude_of_row(row, zoom);

    if projected {
        BoundingBox::new(
            mercator_x(west),
            mercator_y(south),
            mercator_x(east),
            mercator_y(north),
        )
    } else {
        BoundingBox::new(west, south, east, north)
    }
}
