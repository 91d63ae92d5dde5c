//! Tile request URL composition.

use crate::coord::{bounding_box_of, BoundingBox, TileCoordinate};

/// A single tile request against a WMS-style map service.
///
/// The template carries the endpoint and every query parameter except the
/// extent; the request appends `&BBOX=west,south,east,north`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    /// Service endpoint plus fixed query parameters
    pub template_url: String,

    /// Tile extent, in degrees or Mercator meters
    pub bbox: BoundingBox,

    /// Whether `bbox` is in projected Mercator meters
    pub use_projected: bool,
}

impl TileRequest {
    /// Build the request for `coordinate` against `template_url`.
    pub fn new(
        template_url: impl Into<String>,
        coordinate: TileCoordinate,
        use_projected: bool,
    ) -> Self {
        Self {
            template_url: template_url.into(),
            bbox: bounding_box_of(coordinate, use_projected),
            use_projected,
        }
    }

    /// The fully-resolved request URL; also the cache key.
    ///
    /// The extent order is always west, south, east, north, whatever the
    /// projection.
    pub fn url(&self) -> String {
        format!("{}&BBOX={}", self.template_url, self.bbox.to_query_value())
    }
}
