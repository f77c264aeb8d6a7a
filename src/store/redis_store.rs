//! Redis-backed store over a single connection.

use std::sync::Mutex;
use std::time::Duration;

use redis::{Commands, Connection};

use super::Store;
use crate::error::SessionError;
use crate::Result;

/// Store holding one Redis connection.
///
/// Every operation is serialized through the connection. Callers that need
/// parallelism should run several stores or put a pool in front.
pub struct RedisStore {
    conn: Mutex<Option<Connection>>,
    ttl: Option<Duration>,
}

impl RedisStore {
    /// Connect to Redis.
    ///
    /// `network` is `"tcp"` (address `host:port`) or `"unix"` (address is a
    /// socket path). A non-empty `password` is sent with `AUTH` once.
    pub fn connect(network: &str, address: &str, password: &str) -> Result<Self> {
        let url = match network {
            "tcp" => format!("redis://{}/", address),
            "unix" => format!("redis+unix://{}", address),
            other => {
                return Err(SessionError::Store(format!(
                    "unsupported network: {}",
                    other
                )))
            }
        };

        let client = redis::Client::open(url.as_str())?;
        let mut conn = client.get_connection()?;

        if !password.is_empty() {
            // Dropping the connection on failure closes it.
            redis::cmd("AUTH").arg(password).query::<()>(&mut conn)?;
        }

        tracing::debug!("Connected to redis at {} ({})", address, network);

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            ttl: None,
        })
    }

    /// Expire entries after `ttl` on every write.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Get the configured entry TTL.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> redis::RedisResult<T>,
    {
        let mut guard = self.conn.lock().map_err(|_| SessionError::LockPoisoned)?;
        let conn = guard.as_mut().ok_or(SessionError::StoreClosed)?;
        Ok(f(conn)?)
    }
}

impl Store for RedisStore {
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| conn.get::<_, Option<Vec<u8>>>(id))
    }

    fn set(&self, id: &str, value: &[u8]) -> Result<()> {
        let ttl = self.ttl;
        self.with_conn(|conn| {
            let mut cmd = redis::cmd("SET");
            cmd.arg(id).arg(value);
            if let Some(ttl) = ttl {
                cmd.arg("EX").arg(ttl.as_secs().max(1));
            }
            cmd.query::<()>(conn)
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| conn.del::<_, ()>(id))
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().map_err(|_| SessionError::LockPoisoned)?;
        guard.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_addr() -> String {
        std::env::var("REDIS_ADDR").unwrap_or_else(|_| "127.0.0.1:6379".to_string())
    }

    #[test]
    fn test_unsupported_network() {
        let result = RedisStore::connect("udp", "127.0.0.1:6379", "");
        match result {
            Err(SessionError::Store(msg)) => assert!(msg.contains("udp")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("udp network should be rejected"),
        }
    }

    #[test]
    fn test_connection_refused_is_store_error() {
        let result = RedisStore::connect("tcp", "127.0.0.1:1", "");
        match result {
            Err(err @ SessionError::Redis(_)) => assert_eq!(err.code(), "STORE_ERROR"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("nothing listens on port 1"),
        }
    }

    #[test]
    fn test_missing_unix_socket_is_store_error() {
        let result = RedisStore::connect("unix", "/nonexistent/redis.sock", "");
        assert!(matches!(result, Err(SessionError::Redis(_))));
    }

    #[test]
    #[ignore = "Requires a running redis server"]
    fn test_wrong_password_fails_connect() {
        let result = RedisStore::connect("tcp", &redis_addr(), "cookie-sessions-wrong-password");
        assert!(matches!(result, Err(SessionError::Redis(_))));
    }

    #[test]
    #[ignore = "Requires a running redis server"]
    fn test_set_get_delete() {
        let store = RedisStore::connect("tcp", &redis_addr(), "").unwrap();
        store.set("cookie-sessions:test:hoge", b"fuga").unwrap();

        assert_eq!(
            store.get("cookie-sessions:test:hoge").unwrap(),
            Some(b"fuga".to_vec())
        );

        store.delete("cookie-sessions:test:hoge").unwrap();
        assert!(store.get("cookie-sessions:test:hoge").unwrap().is_none());
    }

    #[test]
    #[ignore = "Requires a running redis server"]
    fn test_ttl_write() {
        let store = RedisStore::connect("tcp", &redis_addr(), "")
            .unwrap()
            .with_ttl(Duration::from_secs(60));
        assert_eq!(store.ttl(), Some(Duration::from_secs(60)));

        store.set("cookie-sessions:test:ttl", b"value").unwrap();
        assert!(store.get("cookie-sessions:test:ttl").unwrap().is_some());
        store.delete("cookie-sessions:test:ttl").unwrap();
    }

    #[test]
    #[ignore = "Requires a running redis server"]
    fn test_closed_store() {
        let store = RedisStore::connect("tcp", &redis_addr(), "").unwrap();
        store.close().unwrap();
        assert!(matches!(store.get("any"), Err(SessionError::StoreClosed)));
    }
}
