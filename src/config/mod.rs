//! Configuration module for the branch site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Default keep-alive period; just under the 15 minute idle cutoff of common hosts.
const DEFAULT_KEEPALIVE_SECS: u64 = 840;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Agency name published in the JSON-LD block
    pub agency_name: String,
    /// Canonical public URL of the site
    pub site_url: Option<String>,
    /// URL the keep-alive job pings; `None` disables the job
    pub keepalive_url: Option<String>,
    pub keepalive_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("LIC_DB_PATH")
            .unwrap_or_else(|_| "./data/lic.sqlite".to_string())
            .into();

        let bind_addr = env::var("LIC_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid LIC_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("LIC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("LIC_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let agency_name =
            env::var("LIC_AGENCY_NAME").unwrap_or_else(|_| "LIC Branch Office".to_string());

        let site_url = non_empty_var("LIC_SITE_URL");
        let keepalive_url = non_empty_var("LIC_KEEPALIVE_URL");

        let keepalive_secs = match env::var("LIC_KEEPALIVE_INTERVAL_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Internal(format!("Invalid LIC_KEEPALIVE_INTERVAL_SECS: {}", e))
            })?,
            Err(_) => DEFAULT_KEEPALIVE_SECS,
        };
        if keepalive_secs == 0 {
            return Err(AppError::Internal(
                "LIC_KEEPALIVE_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            agency_name,
            site_url,
            keepalive_url,
            keepalive_interval: Duration::from_secs(keepalive_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
