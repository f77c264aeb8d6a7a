//! Session identifier policy.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use sha1::{Digest, Sha1};

/// Length of an identifier produced by [`generate_sid`].
pub const SID_LENGTH: usize = 40;

/// Function producing a fresh session identifier.
pub type SidGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Function deciding whether an inbound identifier may be trusted.
pub type SidValidator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Generate a new unpredictable session identifier.
///
/// Hashes 32 bytes from the OS entropy source with SHA-1 and renders the
/// digest as 40 lowercase hex characters. Returns an empty string if the
/// entropy source fails; [`validate_sid`] rejects it.
pub fn generate_sid() -> String {
    let mut seed = [0u8; 32];
    if let Err(e) = OsRng.try_fill_bytes(&mut seed) {
        tracing::warn!("Entropy source unavailable: {}", e);
        return String::new();
    }
    hex::encode(Sha1::digest(seed))
}

/// Check that `sid` has exactly the shape [`generate_sid`] produces.
pub fn validate_sid(sid: &str) -> bool {
    sid.len() == SID_LENGTH && sid.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_shape() {
        let sid = generate_sid();
        assert_eq!(sid.len(), SID_LENGTH);
        assert!(validate_sid(&sid));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            let sid = generate_sid();
            assert!(ids.insert(sid.clone()), "Duplicate sid generated: {}", sid);
        }
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_validate_valid() {
        assert!(validate_sid("0123456789abcdef0123456789abcdef01234567"));
        assert!(validate_sid(&"f".repeat(40)));
    }

    #[test]
    fn test_validate_invalid() {
        // Empty
        assert!(!validate_sid(""));

        // Too short / too long
        assert!(!validate_sid(&"a".repeat(39)));
        assert!(!validate_sid(&"a".repeat(41)));

        // Uppercase hex
        assert!(!validate_sid("0123456789ABCDEF0123456789abcdef01234567"));

        // Non-hex
        assert!(!validate_sid(&"g".repeat(40)));

        // Trailing newline is not trimmed
        assert!(!validate_sid("0123456789abcdef0123456789abcdef0123456\n"));
    }
}
