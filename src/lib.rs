//! # cookie-sessions
//!
//! Server-side HTTP sessions keyed by a cookie.
//!
//! A request carries an opaque session id in a cookie. The id maps to a
//! key/value bag held in a pluggable [`Store`]. At the end of the request the
//! session is persisted, rotated, expired or left alone depending on what the
//! handler did with it.
//!
//! ## Features
//!
//! - **Axum middleware**: [`session_middleware`] loads and finalizes a session per request
//! - **Pluggable stores**: in-process [`MemoryStore`] and Redis-backed [`RedisStore`]
//! - **Lifecycle control**: id rotation, expiry, no-store requests and flash messages
//! - **Random ids**: 40-character hex ids from the OS random source
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use axum::{middleware, routing::get, Router};
//! use cookie_sessions::{session_middleware, MemoryStore, SessionHandle, SessionManager};
//!
//! async fn visit(session: SessionHandle) -> cookie_sessions::Result<String> {
//!     let mut session = session.lock()?;
//!     let visits = session.get_as::<u64>("visits").unwrap_or(0) + 1;
//!     session.set("visits", visits)?;
//!     Ok(format!("visits: {visits}"))
//! }
//!
//! #[tokio::main]
//! async fn main() -> cookie_sessions::Result<()> {
//!     cookie_sessions::logging::try_init().ok();
//!
//!     let manager = Arc::new(SessionManager::new(Arc::new(MemoryStore::new())));
//!     let app = Router::new()
//!         .route("/", get(visit))
//!         .layer(middleware::from_fn_with_state(manager, session_middleware));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use error::{Result, SessionError};
pub use session::{
    generate_sid, session_middleware, validate_sid, CookieAction, CookieOptions, FinalizePlan,
    Session, SessionHandle, SessionManager, SessionValues, StoreAction,
};
pub use store::{MemoryStore, RedisStore, Store};
