//! Per-request session lifecycle.

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use cookie::Cookie;
use tracing::{debug, warn};

use super::codec::{self, SessionValues};
use super::cookies::{find_cookie, CookieOptions, DEFAULT_COOKIE_NAME};
use super::id::{generate_sid, validate_sid, SidGenerator, SidValidator};
use super::state::{CookieAction, Session, StoreAction};
use crate::error::SessionError;
use crate::store::Store;
use crate::Result;

/// Process-wide session policy bound to one cookie name and one store.
///
/// Several managers may share a store as long as their identifiers do not
/// collide, which the default generator guarantees in practice.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn Store>,
    cookie_name: String,
    keep_empty: bool,
    cookie: CookieOptions,
    sid_generator: SidGenerator,
    sid_validator: SidValidator,
}

impl SessionManager {
    /// Create a manager with the default cookie name and policies.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            keep_empty: true,
            cookie: CookieOptions::default(),
            sid_generator: Arc::new(generate_sid),
            sid_validator: Arc::new(validate_sid),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Default cookie attributes copied into every new session.
    pub fn with_cookie_options(mut self, options: CookieOptions) -> Self {
        self.cookie = options;
        self
    }

    /// Do not persist or issue cookies for new sessions that stay empty.
    pub fn without_keep_empty(mut self) -> Self {
        self.keep_empty = false;
        self
    }

    /// Install a custom identifier generator.
    ///
    /// The generator must only produce values accepted by the validator.
    pub fn with_sid_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.sid_generator = Arc::new(generator);
        self
    }

    /// Install a custom identifier validator. It must reject `""`.
    pub fn with_sid_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.sid_validator = Arc::new(validator);
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn keep_empty(&self) -> bool {
        self.keep_empty
    }

    pub fn cookie_options(&self) -> &CookieOptions {
        &self.cookie
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Extract this manager's cookie value from request headers.
    pub fn cookie_value(&self, headers: &HeaderMap) -> Option<String> {
        find_cookie(headers, &self.cookie_name)
    }

    /// Resolve the inbound identifier to a stored bag.
    ///
    /// Returns `None` for a missing cookie, an identifier that fails
    /// validation, or an identifier with no stored entry. The store is
    /// only queried with validated identifiers.
    fn load(&self, cookie_value: Option<&str>) -> Result<Option<(String, SessionValues)>> {
        let Some(sid) = cookie_value else {
            return Ok(None);
        };

        if !(self.sid_validator)(sid) {
            debug!(cookie = %self.cookie_name, "Ignoring malformed session cookie");
            return Ok(None);
        }

        let payload = match self.store.get(sid)? {
            Some(payload) if !payload.is_empty() => payload,
            _ => return Ok(None),
        };

        let values = codec::decode(&payload)?;
        Ok(Some((sid.to_string(), values)))
    }

    /// Build the session for a request before its handler runs.
    ///
    /// Store and decode failures are returned; the request must not proceed.
    pub fn start(&self, cookie_value: Option<&str>) -> Result<Session> {
        if let Some((sid, values)) = self.load(cookie_value)? {
            return Ok(Session::new(sid, values, false, self.cookie.clone()));
        }

        let sid = (self.sid_generator)();
        let mut session = Session::new(sid, SessionValues::new(), true, self.cookie.clone());

        if !(self.sid_validator)(session.id()) {
            warn!(
                cookie = %self.cookie_name,
                "Generated session id rejected; session will not be stored"
            );
            session.set_no_store(true);
        }

        Ok(session)
    }

    /// Reconcile the session with the store after its handler ran.
    ///
    /// Returns the cookie to attach to the response, if any.
    pub fn finalize(&self, session: &mut Session) -> Result<Option<Cookie<'static>>> {
        let plan = session.plan(self.keep_empty);
        debug!(
            cookie = %self.cookie_name,
            store = ?plan.store,
            set_cookie = ?plan.cookie,
            "Finalizing session"
        );

        match plan.store {
            StoreAction::Skip => {}
            StoreAction::Delete => {
                self.store.delete(session.id())?;
            }
            StoreAction::Persist => {
                self.persist(session)?;
            }
            StoreAction::Rotate => {
                self.store.delete(session.id())?;
                let sid = (self.sid_generator)();
                if !(self.sid_validator)(&sid) {
                    return Err(SessionError::Entropy);
                }
                session.adopt_id(sid);
                self.persist(session)?;
            }
        }

        let cookie = match plan.cookie {
            CookieAction::Skip => None,
            CookieAction::Set => Some(session.cookie().build(&self.cookie_name, session.id())),
            CookieAction::Expire => Some(
                session
                    .cookie()
                    .build_expired(&self.cookie_name, session.id()),
            ),
        };

        Ok(cookie)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let payload = codec::encode(session.values())?;
        self.store.set(session.id(), &payload)
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_name", &self.cookie_name)
            .field("keep_empty", &self.keep_empty)
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}
