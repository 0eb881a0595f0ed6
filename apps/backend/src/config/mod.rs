//! Server configuration read from the environment.

use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Enables the Redis broker and session mirror when set
    pub redis_url: Option<String>,
    pub idle_timeout: Duration,
    pub sweep_interval: Duration,
    /// Base seed for reproducible dealing
    pub deal_seed: Option<u64>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_var("BACKEND_PORT")?.unwrap_or(DEFAULT_PORT);

        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }

        let redis_url = optional_var("REDIS_URL");

        let idle_timeout = parse_var("SESSION_IDLE_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS);
        let sweep_interval = parse_var("SESSION_SWEEP_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        if sweep_interval == 0 {
            return Err(AppError::config(
                "SESSION_SWEEP_INTERVAL_SECS must be greater than zero",
            ));
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            redis_url,
            idle_timeout: Duration::from_secs(idle_timeout),
            sweep_interval: Duration::from_secs(sweep_interval),
            deal_seed: parse_var("DEAL_SEED")?,
        })
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Unset and blank are both `None`.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    optional_var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::config(format!("Invalid value for {name}: '{raw}'")))
        })
        .transpose()
}
