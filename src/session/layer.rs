//! axum integration: session middleware and request-scoped handle.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::{Session, SessionManager};
use crate::error::SessionError;
use crate::Result;

/// Request-scoped handle to the current session.
///
/// Inserted into request extensions by [`session_middleware`] and available
/// to handlers as an extractor. Extraction fails with
/// [`SessionError::NoSession`] when no session middleware ran.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Lock the session for reading or mutation.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.0.lock().map_err(|_| SessionError::LockPoisoned)
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(SessionError::NoSession)
    }
}

/// Session middleware for axum.
///
/// Loads or creates the session before the inner service runs and
/// finalizes it afterwards, appending a `Set-Cookie` header when needed.
/// Store calls run on the blocking thread pool.
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use cookie_sessions::{session_middleware, MemoryStore, SessionManager};
///
/// let manager = Arc::new(SessionManager::new(Arc::new(MemoryStore::new())));
/// let app: Router = Router::new()
///     .route("/", get(|| async { "hello" }))
///     .layer(middleware::from_fn_with_state(manager, session_middleware));
/// ```
pub async fn session_middleware(
    State(manager): State<Arc<SessionManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_value = manager.cookie_value(request.headers());
    let loader = Arc::clone(&manager);
    let started = tokio::task::spawn_blocking(move || loader.start(cookie_value.as_deref()))
        .await
        .map_err(SessionError::from)
        .and_then(|result| result);
    let session = match started {
        Ok(session) => session,
        Err(e) => {
            error!(cookie = %manager.cookie_name(), "Failed to load session: {}", e);
            return e.into_response();
        }
    };

    let handle = SessionHandle::new(session);
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    let finalizer = Arc::clone(&manager);
    let finalized = tokio::task::spawn_blocking(move || {
        let mut session = handle.lock()?;
        finalizer.finalize(&mut session)
    })
    .await
    .map_err(SessionError::from)
    .and_then(|result| result);

    match finalized {
        Ok(Some(cookie)) => match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => {
                error!(cookie = %manager.cookie_name(), "Invalid Set-Cookie header: {}", e);
                return SessionError::InvalidCookie(e.to_string()).into_response();
            }
        },
        Ok(None) => {}
        Err(e) => {
            error!(cookie = %manager.cookie_name(), "Failed to finalize session: {}", e);
            // Keep the handler's own server error visible.
            if !response.status().is_server_error() {
                return e.into_response();
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CookieOptions, SessionValues};

    #[test]
    fn test_handle_shares_state() {
        let handle = SessionHandle::new(Session::new(
            "a".repeat(40),
            SessionValues::new(),
            true,
            CookieOptions::default(),
        ));
        let clone = handle.clone();

        clone.lock().unwrap().set("counter", 3).unwrap();

        let session = handle.lock().unwrap();
        assert_eq!(session.get_as::<i64>("counter"), Some(3));
        assert!(session.is_written());
    }

    #[tokio::test]
    async fn test_extractor_without_middleware() {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let result = SessionHandle::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(SessionError::NoSession)));
    }
}
