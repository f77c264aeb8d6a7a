//! Session storage backends.
//!
//! A [`Store`] maps a session identifier to an opaque byte payload. The
//! session layer never interprets the payload; it only asks the store to
//! fetch, upsert, or drop it.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::Result;

/// Capability contract for a session backing store.
///
/// Implementations must be safe to share between concurrent requests.
pub trait Store: Send + Sync {
    /// Fetch the payload stored under `id`.
    ///
    /// `Ok(None)` means there is no entry; errors are backend failures.
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite the payload under `id`.
    fn set(&self, id: &str, value: &[u8]) -> Result<()>;

    /// Remove the entry under `id`. Succeeds when the entry is absent.
    fn delete(&self, id: &str) -> Result<()>;

    /// Release backend resources.
    fn close(&self) -> Result<()>;
}
