//! Configuration

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::session::{CustomerId, Session};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Storefront backend base URL
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:5000/api")]
    pub api_base_url: String,

    /// Timeout for every backend request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECONDS", default_value_t = 30u64)]
    pub http_timeout_seconds: u64,
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Session settings.
#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// Customer the storefront acts for
    #[arg(long, env = "CUSTOMER_ID")]
    pub customer_id: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl SessionConfig {
    /// The session every customer-scoped request acts for.
    pub fn session(&self) -> Session {
        Session::new(CustomerId::new(self.customer_id))
    }
}
