//! Server configuration.
//!
//! Every setting can be given as a command-line flag or through its
//! `STUDBOOK_*` environment variable.

use clap::Parser;

use crate::storage::connection::DATABASE_URL;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Stud book backend server
#[derive(Parser, Debug, Clone)]
#[command(name = "studbook", version, about = "Livestock breeding records server")]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "STUDBOOK_LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: String,

    /// SQLite connection string
    #[arg(long, env = "STUDBOOK_DATABASE_URL", default_value = DATABASE_URL)]
    pub database_url: String,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "STUDBOOK_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds
    #[arg(long, env = "STUDBOOK_TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: i64,

    /// Origin allowed by CORS; any origin when unset
    #[arg(long, env = "STUDBOOK_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "STUDBOOK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Only let owners update their animals
    #[arg(long, env = "STUDBOOK_ENFORCE_UPDATE_OWNERSHIP")]
    pub enforce_update_ownership: bool,
}

impl ServerConfig {
    /// Configuration for tests: fixed secret, everything else default
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            listen_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            cors_origin: None,
            log_level: "debug".to_string(),
            enforce_update_ownership: false,
        }
    }
}
