//! Per-request session state and its finalize plan.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::codec::SessionValues;
use super::cookies::CookieOptions;
use crate::error::SessionError;
use crate::Result;

/// Key used by the flash helpers when no key is given.
pub const DEFAULT_FLASH_KEY: &str = "_flash";

/// What finalize does with the store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    /// Leave the store untouched.
    Skip,
    /// Encode the bag and write it under the current identifier.
    Persist,
    /// Delete the entry under the current identifier.
    Delete,
    /// Delete the old entry, adopt a new identifier, then persist.
    Rotate,
}

/// What finalize does with the client cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieAction {
    /// Write no cookie.
    Skip,
    /// Issue the cookie with the final identifier.
    Set,
    /// Issue an already-expired cookie.
    Expire,
}

/// Finalize decision for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizePlan {
    pub store: StoreAction,
    pub cookie: CookieAction,
}

/// One client's session for the duration of a single request.
///
/// Every mutation marks the session written. The intent flags (`expire`,
/// `change_id`, `no_store`) are only read when the request finishes.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    values: SessionValues,
    is_new: bool,
    written: bool,
    expire: bool,
    change_id: bool,
    no_store: bool,
    cookie: CookieOptions,
}

impl Session {
    /// Create a session with a resolved identifier and bag.
    pub fn new(
        id: impl Into<String>,
        values: SessionValues,
        is_new: bool,
        cookie: CookieOptions,
    ) -> Self {
        Self {
            id: id.into(),
            values,
            is_new,
            written: false,
            expire: false,
            change_id: false,
            no_store: false,
            cookie,
        }
    }

    /// Current identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether no prior session was found for this request.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether any mutation ran during this request.
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Borrow the whole bag.
    pub fn values(&self) -> &SessionValues {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a value and deserialize it into `T`.
    ///
    /// Returns `None` when the key is absent or holds a different shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Insert or overwrite a value.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(SessionError::Value)?;
        self.values.insert(key.into(), value);
        self.written = true;
        Ok(())
    }

    /// Remove a value. Marks the session written even if the key was absent.
    pub fn delete(&mut self, key: &str) {
        self.values.remove(key);
        self.written = true;
    }

    /// Queue a flash message under the default key.
    pub fn add_flash<T: Serialize>(&mut self, value: T) -> Result<()> {
        self.add_flash_to(DEFAULT_FLASH_KEY, value)
    }

    /// Queue a flash message under `key`.
    pub fn add_flash_to<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(SessionError::Value)?;
        let mut flashes = match self.values.remove(key) {
            Some(Value::Array(list)) => list,
            Some(other) => vec![other],
            None => Vec::new(),
        };
        flashes.push(value);
        self.values.insert(key.to_string(), Value::Array(flashes));
        self.written = true;
        Ok(())
    }

    /// Take all flash messages under the default key.
    pub fn consume_flashes(&mut self) -> Vec<Value> {
        self.consume_flashes_from(DEFAULT_FLASH_KEY)
    }

    /// Take all flash messages under `key`, oldest first.
    pub fn consume_flashes_from(&mut self, key: &str) -> Vec<Value> {
        match self.values.remove(key) {
            Some(value) => {
                self.written = true;
                match value {
                    Value::Array(list) => list,
                    other => vec![other],
                }
            }
            None => Vec::new(),
        }
    }

    /// Suppress every store and cookie write for this request.
    pub fn set_no_store(&mut self, no_store: bool) {
        self.no_store = no_store;
    }

    pub fn is_no_store(&self) -> bool {
        self.no_store
    }

    /// Request a new identifier when the request finishes.
    pub fn set_change_id(&mut self, change_id: bool) {
        self.change_id = change_id;
    }

    pub fn will_change_id(&self) -> bool {
        self.change_id
    }

    /// Request destruction of the session when the request finishes.
    pub fn set_expire(&mut self, expire: bool) {
        self.expire = expire;
    }

    pub fn will_expire(&self) -> bool {
        self.expire
    }

    pub fn has_any_key(&self) -> bool {
        !self.values.is_empty()
    }

    /// Cookie attributes used if a cookie is written.
    pub fn cookie(&self) -> &CookieOptions {
        &self.cookie
    }

    /// Per-session override of the cookie attributes.
    pub fn cookie_mut(&mut self) -> &mut CookieOptions {
        &mut self.cookie
    }

    pub(crate) fn adopt_id(&mut self, id: String) {
        self.id = id;
    }

    /// Decide what finalize must do.
    ///
    /// `keep_empty` is the manager policy for brand-new sessions that never
    /// acquired a key: when set they are persisted and issued a cookie to
    /// reserve the identifier.
    pub fn plan(&self, keep_empty: bool) -> FinalizePlan {
        if self.no_store {
            return FinalizePlan {
                store: StoreAction::Skip,
                cookie: CookieAction::Skip,
            };
        }

        let reserve_empty = self.is_new && keep_empty && !self.has_any_key();

        let store = if self.expire {
            StoreAction::Delete
        } else if self.change_id {
            StoreAction::Rotate
        } else if self.written || reserve_empty {
            StoreAction::Persist
        } else {
            StoreAction::Skip
        };

        let cookie = if self.expire {
            CookieAction::Expire
        } else if self.change_id || reserve_empty || (self.is_new && self.written) {
            CookieAction::Set
        } else {
            CookieAction::Skip
        };

        FinalizePlan { store, cookie }
    }
}
