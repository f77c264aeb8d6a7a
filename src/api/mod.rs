//! HTTP layer for cookie-sessions.
//!
//! A small demo application wired through [`session_middleware`]. Each route
//! exercises one part of the session lifecycle.
//!
//! ## Endpoints
//!
//! - `GET /` - Greet the logged-in user
//! - `GET /counter` - Increment a per-session counter
//! - `GET /login?name=` - Store a user name and rotate the session id
//! - `GET /logout` - Expire the session
//! - `GET /flash` - Show queued flash messages or queue new ones
//! - `GET /health` - Health check, never touches the session store
//! - `GET /api/v1` - API information
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cookie_sessions::api::{serve, ServerConfig};
//! use cookie_sessions::{MemoryStore, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> cookie_sessions::Result<()> {
//!     let manager = SessionManager::new(Arc::new(MemoryStore::new()));
//!     serve(ServerConfig::new("127.0.0.1", 3000), Arc::new(manager)).await
//! }
//! ```
//!
//! [`session_middleware`]: crate::session::session_middleware

pub mod handlers;
pub mod router;
pub mod types;

// Re-export commonly used types
pub use router::{
    create_router, create_router_with_manager, serve, with_session_layers, ServerConfig,
};
pub use types::{ErrorResponse, LoginQuery};
