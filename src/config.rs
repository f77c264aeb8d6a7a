//! Configuration management for the demo server.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::session::{is_valid_cookie_name, CookieOptions, SessionManager, DEFAULT_COOKIE_NAME};
use crate::store::{MemoryStore, RedisStore, Store};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session cookie and policy configuration.
    pub session: SessionSection,
    /// Backing store configuration.
    pub store: StoreSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Cookie name.
    pub cookie_name: String,
    /// Cookie `Path`.
    pub path: Option<String>,
    /// Cookie `Domain`.
    pub domain: Option<String>,
    /// Cookie `Secure` flag.
    pub secure: bool,
    /// Cookie `HttpOnly` flag.
    pub http_only: bool,
    /// Cookie `Max-Age` in seconds.
    pub max_age_secs: Option<i64>,
    /// Persist new sessions even when they stay empty.
    pub keep_empty: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            http_only: true,
            max_age_secs: None,
            keep_empty: true,
        }
    }
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

/// Store configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Which backend to open.
    pub backend: StoreBackend,
    /// Redis network: "tcp" or "unix".
    pub network: String,
    /// Redis address (host:port or socket path).
    pub address: String,
    /// Redis password; empty disables `AUTH`.
    pub password: String,
    /// Redis entry TTL in seconds.
    pub ttl_secs: Option<u64>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            network: "tcp".to_string(),
            address: "127.0.0.1:6379".to_string(),
            password: String::new(),
            ttl_secs: None,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("COOKIE_SESSIONS_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("COOKIE_SESSIONS_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(name) = std::env::var("COOKIE_SESSIONS_COOKIE_NAME") {
            if !name.is_empty() {
                self.session.cookie_name = name;
            }
        }

        if let Ok(addr) = std::env::var("COOKIE_SESSIONS_REDIS_ADDR") {
            if !addr.is_empty() {
                self.store.backend = StoreBackend::Redis;
                self.store.address = addr;
            }
        }

        if let Ok(password) = std::env::var("COOKIE_SESSIONS_REDIS_PASSWORD") {
            self.store.password = password;
        }

        if let Ok(level) = std::env::var("COOKIE_SESSIONS_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }

        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(ref name) = args.cookie_name {
            self.session.cookie_name = name.clone();
        }

        if let Some(ref addr) = args.redis {
            self.store.backend = StoreBackend::Redis;
            self.store.address = addr.clone();
        }

        if args.no_keep_empty {
            self.session.keep_empty = false;
        }

        if args.secure {
            self.session.secure = true;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Check values that would otherwise only fail once requests arrive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_cookie_name(&self.session.cookie_name) {
            return Err(ConfigError::InvalidCookieName(self.session.cookie_name.clone()));
        }
        Ok(())
    }

    /// Convert to ServerConfig for the HTTP server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let mut server_config = ServerConfig::new(host.to_string(), self.server.port);
        if !self.server.graceful_shutdown {
            server_config = server_config.without_graceful_shutdown();
        }

        Ok(server_config)
    }

    /// Default cookie attributes for new sessions.
    pub fn cookie_options(&self) -> CookieOptions {
        let mut options = CookieOptions::new()
            .secure(self.session.secure)
            .http_only(self.session.http_only);
        if let Some(ref path) = self.session.path {
            options = options.with_path(path.clone());
        }
        if let Some(ref domain) = self.session.domain {
            options = options.with_domain(domain.clone());
        }
        if let Some(secs) = self.session.max_age_secs {
            options = options.with_max_age(time::Duration::seconds(secs));
        }
        options
    }

    /// Open the configured backing store.
    pub fn build_store(&self) -> Result<Arc<dyn Store>, ConfigError> {
        match self.store.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::Redis => {
                let store = &self.store;
                let mut redis = RedisStore::connect(&store.network, &store.address, &store.password)
                    .map_err(|e| ConfigError::Store(e.to_string()))?;
                if let Some(secs) = store.ttl_secs {
                    redis = redis.with_ttl(Duration::from_secs(secs));
                }
                Ok(Arc::new(redis))
            }
        }
    }

    /// Build the session manager over `store`.
    pub fn to_session_manager(&self, store: Arc<dyn Store>) -> Result<SessionManager, ConfigError> {
        self.validate()?;

        let mut manager = SessionManager::new(store)
            .with_cookie_name(self.session.cookie_name.clone())
            .with_cookie_options(self.cookie_options());
        if !self.session.keep_empty {
            manager = manager.without_keep_empty();
        }
        Ok(manager)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Invalid cookie name.
    InvalidCookieName(String),
    /// Store could not be opened.
    Store(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidCookieName(name) => write!(f, "invalid cookie name: '{}'", name),
            Self::Store(e) => write!(f, "failed to open session store: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
