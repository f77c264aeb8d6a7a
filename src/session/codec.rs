//! Encoding of the session bag to store payloads.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::SessionError;
use crate::Result;

/// Key/value bag carried by a session.
pub type SessionValues = HashMap<String, Value>;

/// Serialize a bag to the bytes handed to the store.
pub fn encode(values: &SessionValues) -> Result<Vec<u8>> {
    serde_json::to_vec(values).map_err(SessionError::Encode)
}

/// Deserialize a store payload back into a bag.
pub fn decode(bytes: &[u8]) -> Result<SessionValues> {
    serde_json::from_slice(bytes).map_err(SessionError::Decode)
}
