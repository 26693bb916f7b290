//! Geotech Hub edge service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 EDGE SERVICE                  │
//!                    │                                               │
//!   Browser request  │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│   geo    │──▶│  pages  │──▶│ page cache│  │
//!                    │  │middleware│   │ handlers│   └─────┬─────┘  │
//!                    │  └──────────┘   └─────────┘         │ miss   │
//!                    │                                     ▼        │
//!   CMS webhook      │  ┌──────────────┐            ┌───────────┐   │     Headless
//!   ─────────────────┼─▶│ /api/        │───────────▶│    cms    │◀──┼──── CMS
//!                    │  │ revalidate   │ invalidate │  client   │   │     (Directus)
//!                    │  └──────────────┘            └───────────┘   │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;

use geotech_edge::config::loader;
use geotech_edge::http::HttpServer;
use geotech_edge::lifecycle::{signals, Shutdown};
use geotech_edge::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration: optional TOML file, env overrides on top.
    let config = match config_path() {
        Some(path) => loader::load_config(&path)?,
        None => loader::load_from_env()?,
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        cms_base_url = %config.cms.base_url,
        cache_ttl_secs = config.cache.ttl_secs,
        dev_fallback = config.revalidate.dev_fallback,
        "Configuration loaded"
    );
    if config.revalidate.dev_fallback && config.revalidate.secret.is_none() {
        tracing::warn!("Revalidation endpoint is using the development fallback secret");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::install(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// `CONFIG_PATH` env var, or `edge.toml` next to the binary when present.
fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from("edge.toml");
    default.exists().then_some(default)
}
