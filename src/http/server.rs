//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, geo resolver)
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - Collaborators (CMS fetcher, invalidator) sit behind trait objects in
//!   the shared state so tests can swap them
//! - The revalidation secret is resolved once at startup; the handler only
//!   ever sees the final value

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{DependencyTable, Invalidator, PageCache};
use crate::cms::{CmsError, ContentFetcher, DirectusClient};
use crate::config::schema::EdgeConfig;
use crate::geo::middleware::{geo_middleware, GeoPolicy};
use crate::geo::region::Region;
use crate::http::{pages, revalidate};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: PageCache,
    pub invalidator: Arc<dyn Invalidator>,
    pub cms: Arc<dyn ContentFetcher>,
    /// Resolved revalidation secret; `None` means the endpoint rejects
    /// everything (fail closed).
    pub secret: Option<String>,
    pub dependencies: Arc<DependencyTable>,
    pub default_region: Region,
}

/// HTTP server for the edge service.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
}

impl HttpServer {
    /// Create a server talking to the configured CMS.
    pub fn new(config: EdgeConfig) -> Result<Self, CmsError> {
        let cms = Arc::new(DirectusClient::new(&config.cms)?);
        Ok(Self::with_fetcher(config, cms))
    }

    /// Create a server with an injected content fetcher.
    pub fn with_fetcher(config: EdgeConfig, cms: Arc<dyn ContentFetcher>) -> Self {
        let cache = PageCache::new(Duration::from_secs(config.cache.ttl_secs));
        let state = AppState {
            invalidator: Arc::new(cache.clone()),
            cache,
            cms,
            secret: config.revalidate.resolved_secret().map(str::to_string),
            dependencies: Arc::new(DependencyTable::from_rules(&config.revalidate.dependents)),
            default_region: config.geo.default_region,
        };

        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
fn build_router(config: &EdgeConfig, state: AppState) -> Router {
    let geo_policy = Arc::new(GeoPolicy::from_config(&config.geo));

    Router::new()
        .route("/", get(pages::home))
        .route("/services", get(pages::services))
        .route("/machinery", get(pages::machinery))
        .route("/portfolio", get(pages::portfolio_list))
        .route("/portfolio/{id}", get(pages::portfolio_detail))
        .route("/api/revalidate", get(revalidate::revalidate))
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn_with_state(geo_policy, geo_middleware))
        .layer(middleware::from_fn(track_requests))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Request metrics middleware. The route set is small and fixed, so the
/// raw path is an acceptable label.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), &path, start);
    response
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
