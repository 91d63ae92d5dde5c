//! Tile service integration tests.
//!
//! Tests verify:
//! - Cache hits are served without touching the network
//! - Misses fetch once and populate the cache for later loads
//! - Fetch failures are reported and leave the cache untouched
//! - Concurrent identical loads all succeed and leave one entry

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use wms_tile_engine::coord::TileCoordinate;
use wms_tile_engine::error::{FetchError, TileError};
use wms_tile_engine::tile::{
    cache_key_hash, OverlayConfig, TileCacheStore, TileService, WmsTileOverlay,
};

use super::test_utils::{
    all_cache_entries, cache_files, overlay_in, FetchMode, TrackingMockFetcher, PNG_TILE,
    TEMPLATE,
};

// =============================================================================
// Cache Hit / Miss
// =============================================================================

#[tokio::test]
async fn test_prepopulated_cache_is_served_without_network() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(5, 3, 4);

    let path = overlay.service().cache_path(coord, overlay.config());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"previously cached tile").unwrap();

    let response = overlay.load_tile(coord).await.unwrap();

    assert!(response.cache_hit);
    assert_eq!(response.data, Bytes::from_static(b"previously cached tile"));
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_miss_then_populate() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(5, 3, 4);

    let first = overlay.load_tile(coord).await.unwrap();
    assert!(!first.cache_hit);
    assert_eq!(first.data, Bytes::from_static(PNG_TILE));
    assert_eq!(fetcher.request_count(), 1);

    let url = overlay.config().request_for(coord).url();
    assert_eq!(cache_files(tmp.path()), vec![cache_key_hash(&url)]);

    let second = overlay.load_tile(coord).await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(second.data, first.data);
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_request_url_carries_bbox() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, false));

    overlay.load_tile(TileCoordinate::new(0, 0, 0)).await.unwrap();

    let requests = fetcher.get_requests().await;
    assert_eq!(requests.len(), 1);

    let (template, bbox) = requests[0].split_once("&BBOX=").unwrap();
    assert_eq!(template, TEMPLATE);

    let values: Vec<f64> = bbox.split(',').map(|v| v.parse().unwrap()).collect();
    assert_eq!(values.len(), 4);
    assert_eq!(values[0], -180.0);
    assert!((values[1] + 85.0511).abs() < 1e-3);
    assert_eq!(values[2], 180.0);
    assert!((values[3] - 85.0511).abs() < 1e-3);
}

#[tokio::test]
async fn test_distinct_tiles_get_distinct_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));

    for column in 0..4 {
        overlay
            .load_tile(TileCoordinate::new(column, 1, 2))
            .await
            .unwrap();
    }

    assert_eq!(fetcher.request_count(), 4);
    assert_eq!(cache_files(tmp.path()).len(), 4);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_network_failure_leaves_no_file() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::with_mode(FetchMode::Refuse);
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(1, 1, 1);

    let result = overlay.load_tile(coord).await;

    assert!(matches!(
        result,
        Err(TileError::Network(FetchError::Connection(_)))
    ));
    assert_eq!(all_cache_entries(tmp.path()), 0);
}

#[tokio::test]
async fn test_error_status_is_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::with_mode(FetchMode::Status(503));
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(0, 0, 0);

    for _ in 0..2 {
        match overlay.load_tile(coord).await {
            Err(TileError::Network(FetchError::Status { status, .. })) => assert_eq!(status, 503),
            other => panic!("Expected HTTP 503, got {:?}", other),
        }
    }

    // no negative caching: every attempt goes back to the service
    assert_eq!(fetcher.request_count(), 2);
    assert_eq!(all_cache_entries(tmp.path()), 0);
}

#[tokio::test]
async fn test_zero_byte_entry_is_served_as_is() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(2, 1, 2);

    let path = overlay.service().cache_path(coord, overlay.config());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"").unwrap();

    let response = overlay.load_tile(coord).await.unwrap();

    assert!(response.cache_hit);
    assert!(response.data.is_empty());
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_unusable_storage_root_still_loads() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("not-a-dir");
    std::fs::write(&root, b"file in the way").unwrap();

    let fetcher = TrackingMockFetcher::new();
    let overlay = overlay_in(&root, &fetcher, OverlayConfig::new(TEMPLATE, true));

    let response = overlay.load_tile(TileCoordinate::new(0, 0, 0)).await.unwrap();

    assert!(!response.cache_hit);
    assert_eq!(response.data, Bytes::from_static(PNG_TILE));
    assert_eq!(fetcher.request_count(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_loads_leave_one_entry() {
    const LOADS: usize = 16;

    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new().with_delay(Duration::from_millis(100));
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));
    let coord = TileCoordinate::new(7, 5, 4);

    let receivers: Vec<_> = (0..LOADS).map(|_| overlay.spawn_load_tile(coord)).collect();

    for rx in receivers {
        let response = rx.await.unwrap().unwrap();
        assert_eq!(response.data, Bytes::from_static(PNG_TILE));
    }

    // no coalescing: every overlapping miss fetched on its own
    assert_eq!(fetcher.request_count(), LOADS);

    assert_eq!(cache_files(tmp.path()).len(), 1);
    assert_eq!(all_cache_entries(tmp.path()), 1);

    let path = overlay.service().cache_path(coord, overlay.config());
    assert_eq!(std::fs::read(path).unwrap(), PNG_TILE);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_fail_independently() {
    const LOADS: usize = 8;

    let tmp = tempfile::tempdir().unwrap();
    let fetcher =
        TrackingMockFetcher::with_mode(FetchMode::Refuse).with_delay(Duration::from_millis(20));
    let overlay = overlay_in(tmp.path(), &fetcher, OverlayConfig::new(TEMPLATE, true));

    let receivers: Vec<_> = (0..LOADS)
        .map(|_| overlay.spawn_load_tile(TileCoordinate::new(0, 0, 0)))
        .collect();

    for rx in receivers {
        assert!(matches!(rx.await.unwrap(), Err(TileError::Network(_))));
    }

    assert_eq!(fetcher.request_count(), LOADS);
    assert_eq!(all_cache_entries(tmp.path()), 0);
}

#[tokio::test]
async fn test_overlays_share_one_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = TrackingMockFetcher::new();
    let service = Arc::new(TileService::new(
        fetcher.clone(),
        TileCacheStore::new(tmp.path()),
    ));

    let warnings = WmsTileOverlay::new(OverlayConfig::new(TEMPLATE, true), Arc::clone(&service));
    let radar = warnings.with_config(OverlayConfig::new(
        "https://maps.example.com/geoserver/wms?LAYERS=radar",
        true,
    ));
    let coord = TileCoordinate::new(1, 0, 1);

    warnings.load_tile(coord).await.unwrap();
    radar.load_tile(coord).await.unwrap();
    // same URL as the first load, so it hits the cache
    let again = warnings.with_config(OverlayConfig::new(TEMPLATE, true).with_opacity(0.3));
    assert!(again.load_tile(coord).await.unwrap().cache_hit);

    assert_eq!(fetcher.request_count(), 2);
    assert_eq!(cache_files(tmp.path()).len(), 2);
}
