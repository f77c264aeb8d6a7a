//! Command-line interface for the demo server.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Session cookie name.
    pub cookie_name: Option<String>,
    /// Redis address; selects the redis store.
    pub redis: Option<String>,
    /// Do not persist new sessions that stay empty.
    pub no_keep_empty: bool,
    /// Mark the session cookie `Secure`.
    pub secure: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('n') | Long("cookie-name") => {
                let value: String = parser.value()?.parse()?;
                if value.is_empty() {
                    return Err(ArgsError::InvalidValue("cookie-name", value));
                }
                result.cookie_name = Some(value);
            }
            Short('r') | Long("redis") => {
                result.redis = Some(parser.value()?.parse()?);
            }
            Long("no-keep-empty") => {
                result.no_keep_empty = true;
            }
            Long("secure") => {
                result.secure = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"cookie-sessions {version}
Cookie-keyed server-side sessions demo server

USAGE:
    cookie-sessions [OPTIONS]

OPTIONS:
    -H, --host <ADDR>         Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>         Port to listen on [default: 3000]
    -c, --config <FILE>       Path to configuration file (JSON)
    -n, --cookie-name <NAME>  Session cookie name [default: sessions]
    -r, --redis <ADDR>        Store sessions in redis at ADDR (host:port)
        --no-keep-empty       Do not store sessions that never get a key
        --secure              Mark the session cookie Secure
    -l, --log-level <LVL>     Log level (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

ENVIRONMENT VARIABLES:
    COOKIE_SESSIONS_HOST            Host address (overrides config)
    COOKIE_SESSIONS_PORT            Port number (overrides config)
    COOKIE_SESSIONS_COOKIE_NAME     Cookie name (overrides config)
    COOKIE_SESSIONS_REDIS_ADDR      Redis address (overrides config)
    COOKIE_SESSIONS_REDIS_PASSWORD  Redis password (overrides config)
    COOKIE_SESSIONS_LOG_LEVEL       Log level (overrides config)
    RUST_LOG                        Alternative log level setting

EXAMPLES:
    # In-memory sessions on localhost:3000
    cookie-sessions

    # Redis-backed sessions with a custom cookie
    cookie-sessions -r 127.0.0.1:6379 -n myapp_session

    # Start with config file
    cookie-sessions -c /etc/cookie-sessions/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("cookie-sessions {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
