//! Session management module.
//!
//! This module provides the per-request session object, the identifier
//! policy, the payload codec, and the [`SessionManager`] that decides when a
//! session is persisted and when its cookie is written.

pub mod codec;
mod cookies;
mod id;
mod layer;
mod manager;
mod state;

pub use codec::SessionValues;
pub use cookies::{find_cookie, is_valid_cookie_name, CookieOptions, DEFAULT_COOKIE_NAME};
pub use id::{generate_sid, validate_sid, SidGenerator, SidValidator, SID_LENGTH};
pub use layer::{session_middleware, SessionHandle};
pub use manager::SessionManager;
pub use state::{CookieAction, FinalizePlan, Session, StoreAction, DEFAULT_FLASH_KEY};
