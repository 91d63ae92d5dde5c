//! WMS Tile Engine - cache-or-fetch loader for WMS map overlays.
//!
//! This binary wires the CLI to the tile service: `serve` exposes it over
//! HTTP, `fetch` loads one tile and `inspect` shows how a tile resolves.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wms_tile_engine::{
    config::{Cli, Command, FetchConfig, InspectConfig, OverlayArgs, ServeConfig},
    coord::{bounding_box_of, zoom_level},
    io::HttpTileFetcher,
    server::{create_router, RouterConfig},
    tile::{content_type_for, TileService, WmsTileOverlay},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Fetch(config) => run_fetch(config).await,
        Command::Inspect(config) => run_inspect(config).await,
    }
}

/// Build the overlay the CLI arguments describe, backed by an HTTP fetcher.
fn build_overlay(args: &OverlayArgs) -> Result<WmsTileOverlay<HttpTileFetcher>, String> {
    let config = args.overlay_config()?;
    let fetcher = HttpTileFetcher::new().map_err(|e| e.to_string())?;
    let service =
        TileService::new(fetcher, args.store()).with_cache_folder(args.cache_folder.as_str());

    Ok(WmsTileOverlay::new(config, Arc::new(service)))
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let overlay = match build_overlay(&config.overlay) {
        Ok(overlay) => overlay,
        Err(e) => {
            error!("Failed to set up overlay: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("WMS Tile Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Template: {}", overlay.config().base_url_template);
    info!(
        "  Extents: {}",
        if overlay.config().use_projected {
            "Mercator meters"
        } else {
            "degrees"
        }
    );
    info!("  Opacity: {}", overlay.config().opacity);
    info!(
        "  Cache: {}",
        overlay
            .service()
            .store()
            .folder_path(overlay.service().cache_folder())
            .display()
    );

    let router = create_router(overlay, build_router_config(&config));
    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/tiles/0/0/0.png", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "wms_tile_engine=debug,tower_http=debug"
    } else {
        "wms_tile_engine=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Fetch Command
// =============================================================================

async fn run_fetch(config: FetchConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let (overlay, coordinate) = match build_overlay(&config.overlay)
        .and_then(|overlay| Ok((overlay, config.tile.coordinate()?)))
    {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let response = match overlay.load_tile(coordinate).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!(
                "Error loading tile {}/{}/{}: {}",
                coordinate.zoom, coordinate.column, coordinate.row, e
            );
            return ExitCode::FAILURE;
        }
    };

    match config.output {
        Some(ref path) => {
            if let Err(e) = tokio::fs::write(path, &response.data).await {
                eprintln!("Error writing {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            println!("{}", path.display());
        }
        None => {
            println!(
                "Tile:         {}/{}/{}",
                coordinate.zoom, coordinate.column, coordinate.row
            );
            println!("Size:         {} bytes", response.data.len());
            println!("Content-Type: {}", content_type_for(&response.data));
            println!("Cache hit:    {}", response.cache_hit);
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let (overlay_config, coordinate) = match config
        .overlay
        .overlay_config()
        .and_then(|overlay| Ok((overlay, config.tile.coordinate()?)))
    {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = config.overlay.store();
    let url = overlay_config.request_for(coordinate).url();
    let path = store.path_for(&url, &config.overlay.cache_folder);
    let bbox = bounding_box_of(coordinate, overlay_config.use_projected);

    println!(
        "Tile:       {}/{}/{}",
        coordinate.zoom, coordinate.column, coordinate.row
    );
    println!("BBOX:       {}", bbox.to_query_value());
    println!("URL:        {}", url);
    println!("Cache file: {}", path.display());
    println!("Cached:     {}", store.exists(&path).await);

    if let Some(scale) = config.scale {
        println!("Zoom level: {} (scale {})", zoom_level(scale), scale);
    }

    ExitCode::SUCCESS
}
