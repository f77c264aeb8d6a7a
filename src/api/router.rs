//! API router configuration.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::handlers::{api_info, counter, flash, health, index, login, logout};
use crate::session::{session_middleware, SessionManager};
use crate::store::MemoryStore;

/// Create the demo router backed by a fresh in-memory store.
pub fn create_router() -> Router {
    create_router_with_manager(Arc::new(SessionManager::new(Arc::new(MemoryStore::new()))))
}

/// Create the demo router with a configured session manager.
pub fn create_router_with_manager(manager: Arc<SessionManager>) -> Router {
    let routes = Router::new()
        .route("/", get(index))
        .route("/counter", get(counter))
        .route("/login", get(login))
        .route("/logout", get(logout))
        .route("/flash", get(flash))
        .route("/health", get(health))
        .route("/api/v1", get(api_info));

    with_session_layers(routes, manager)
}

/// Wrap `routes` with the session middleware and HTTP tracing.
///
/// A panicking handler is turned into a 500 inside the session layer, so
/// the session is still finalized.
pub fn with_session_layers(routes: Router, manager: Arc<SessionManager>) -> Router {
    routes
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(manager, session_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop on Ctrl-C and close the store.
    pub graceful_shutdown: bool,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            graceful_shutdown: true,
        }
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 3000)
    }
}

/// Start the demo server.
pub async fn serve(config: ServerConfig, manager: Arc<SessionManager>) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_manager(Arc::clone(&manager));

    tracing::info!("Starting cookie-sessions server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(crate::error::SessionError::Io)?;

    let server = axum::serve(listener, router);
    let result = if config.graceful_shutdown {
        server.with_graceful_shutdown(shutdown_signal()).await
    } else {
        server.await
    };
    result?;

    tracing::info!("Server stopped, closing session store");
    manager.store().close()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.graceful_shutdown);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_server_config_custom() {
        let config = ServerConfig::new("0.0.0.0", 8080).without_graceful_shutdown();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(!config.graceful_shutdown);
    }

    #[test]
    fn test_router_creation() {
        let _router = create_router();
    }
}
