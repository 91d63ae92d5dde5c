//! Outbound I/O for tile bodies.
//!
//! [`TileFetcher`] is the seam between the tile engine and the network.
//! [`HttpTileFetcher`] implements it with a single reqwest GET per tile.

mod fetcher;
mod http_fetcher;

pub use fetcher::TileFetcher;
pub use http_fetcher::{HttpTileFetcher, USER_AGENT};
