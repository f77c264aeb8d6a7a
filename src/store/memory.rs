//! Volatile in-process store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::Store;
use crate::error::SessionError;
use crate::Result;

/// Thread-safe in-memory store.
///
/// Reads run concurrently, writes are exclusive. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStore {
    values: RwLock<Option<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(Some(HashMap::new())),
        }
    }

    /// Get the number of stored entries.
    ///
    /// Reports `0` when the store is closed or its lock is poisoned. Use
    /// [`contains`](Self::contains) or the [`Store`] methods to observe those
    /// conditions as errors.
    pub fn count(&self) -> usize {
        self.values
            .read()
            .map(|v| v.as_ref().map_or(0, HashMap::len))
            .unwrap_or(0)
    }

    /// Check if an entry exists.
    pub fn contains(&self, id: &str) -> Result<bool> {
        let values = self.values.read().map_err(|_| SessionError::LockPoisoned)?;
        let values = values.as_ref().ok_or(SessionError::StoreClosed)?;
        Ok(values.contains_key(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().map_err(|_| SessionError::LockPoisoned)?;
        let values = values.as_ref().ok_or(SessionError::StoreClosed)?;
        Ok(values.get(id).cloned())
    }

    fn set(&self, id: &str, value: &[u8]) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        let values = values.as_mut().ok_or(SessionError::StoreClosed)?;
        values.insert(id.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        let values = values.as_mut().ok_or(SessionError::StoreClosed)?;
        values.remove(id);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *values = None;
        Ok(())
    }
}
