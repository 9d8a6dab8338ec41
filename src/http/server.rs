//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all API handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener
//! - Load the inventory snapshot on startup, write it back on shutdown

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api;
use crate::cache::ResponseCache;
use crate::config::GridmapConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::store::{MapStore, StoreError};
use crate::validation::{ValidationError, Validators};

/// Errors that stop the server from starting or shutting down cleanly.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Inventory error: {0}")]
    Store(#[from] StoreError),

    #[error("Schema error: {0}")]
    Validation(#[from] ValidationError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MapStore>,
    pub cache: ResponseCache,
    pub validators: Validators,
}

impl AppState {
    pub fn new(store: MapStore, cache_enabled: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            store: Arc::new(store),
            cache: ResponseCache::new(cache_enabled),
            validators: Validators::compile()?,
        })
    }
}

/// HTTP server for the map inventory API.
pub struct HttpServer {
    router: Router,
    config: GridmapConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server, loading the inventory snapshot if one is configured.
    pub fn new(config: GridmapConfig) -> Result<Self, ServerError> {
        let store = match &config.storage.snapshot_path {
            Some(path) => MapStore::load_from_file(path)?,
            None => MapStore::new(None),
        };
        Self::with_store(config, store)
    }

    /// Create a server around an existing inventory.
    pub fn with_store(config: GridmapConfig, store: MapStore) -> Result<Self, ServerError> {
        let state = AppState::new(store, config.cache.enabled)?;
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GridmapConfig, state: AppState) -> Router {
        api::routes()
            .with_state(state)
            .layer(axum::middleware::from_fn(metrics::track_metrics))
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then persist the inventory.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            maps = self.state.store.count(),
            cache = self.config.cache.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        self.state.store.save_to_file()?;
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GridmapConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Wait for the shutdown broadcast. A closed channel counts as shutdown.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}
