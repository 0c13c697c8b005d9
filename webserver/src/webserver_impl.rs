//! Main webserver implementation
//!
//! Builds the axum router over a shared run controller and serves it until
//! Ctrl+C.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shared::{Component, component_info, logging};
use tester::{HttpClient, KeyValueStore};

use crate::error::{WebServerError, WebServerResult};
use crate::state::{AppState, BridgeController};
use crate::web::handlers::api;

/// HTTP bridge with the controller injected
pub struct WebServer<H, S>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    state: AppState<H, S>,
}

impl<H, S> WebServer<H, S>
where
    H: HttpClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(controller: BridgeController<H, S>) -> Self {
        Self {
            state: AppState::new(controller),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/api/state", get(api::get_state::<H, S>))
            .route("/api/steps", get(api::list_steps::<H, S>))
            .route("/api/steps/:index", get(api::get_step::<H, S>))
            .route("/api/run", post(api::run_step::<H, S>))
            .route("/api/advance", post(api::advance::<H, S>))
            .route("/api/retreat", post(api::retreat::<H, S>))
            .route("/api/jump/:index", post(api::jump::<H, S>))
            .route("/api/auto-run", post(api::auto_run::<H, S>))
            .route("/api/reset", post(api::reset::<H, S>))
            // Health check
            .route("/health", get(api::health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    // The documentation page may be served from another origin
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self, addr: SocketAddr) -> WebServerResult<()> {
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {addr}: {e}")))?;

        component_info!(Component::current(), "🌐 API tester bridge listening on http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    pub fn state(&self) -> &AppState<H, S> {
        &self.state
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(Component::current(), "Received Ctrl+C signal"),
        Err(e) => logging::log_error(Component::current(), "Signal handling", &e),
    }
}
