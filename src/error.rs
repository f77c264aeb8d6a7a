//! Error types for cookie-sessions.

use thiserror::Error;

/// Main error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Backing store rejected an operation.
    #[error("store error: {0}")]
    Store(String),

    /// Redis backend failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Store was used after `close`.
    #[error("store is closed")]
    StoreClosed,

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// Persisted payload could not be decoded.
    #[error("failed to decode session data: {0}")]
    Decode(#[source] serde_json::Error),

    /// Session bag could not be encoded.
    #[error("failed to encode session data: {0}")]
    Encode(#[source] serde_json::Error),

    /// Value cannot be represented in the session bag.
    #[error("unsupported session value: {0}")]
    Value(#[source] serde_json::Error),

    /// Identifier generator produced a value the validator rejects.
    #[error("failed to generate a valid session identifier")]
    Entropy,

    /// Cookie could not be rendered as a header value.
    #[error("invalid session cookie: {0}")]
    InvalidCookie(String),

    /// No session layer ran for this request.
    #[error("no session attached to this request")]
    NoSession,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking store task panicked or was cancelled.
    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SessionError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(_) | Self::Redis(_) | Self::StoreClosed => "STORE_ERROR",
            Self::LockPoisoned | Self::Task(_) => "INTERNAL_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) | Self::Value(_) => "ENCODE_ERROR",
            Self::Entropy => "ENTROPY_ERROR",
            Self::InvalidCookie(_) => "COOKIE_ERROR",
            Self::NoSession => "NO_SESSION",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Convenience Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
