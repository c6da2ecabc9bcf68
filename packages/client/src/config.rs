use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, e.g. `http://localhost:8080`
    pub api_url: String,
    /// WebSocket endpoint for the realtime channel
    pub socket_url: String,
    /// Where the token pair is persisted between runs
    pub token_file: PathBuf,
    /// Notification polling fallback interval
    pub poll_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let poll_secs: u64 = env::var("BLOODLINK_POLL_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .context("BLOODLINK_POLL_SECS must be a valid number of seconds")?;

        Ok(Self {
            api_url: env::var("BLOODLINK_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            socket_url: env::var("BLOODLINK_SOCKET_URL")
                .unwrap_or_else(|_| "ws://localhost:8080/socket".to_string()),
            token_file: env::var("BLOODLINK_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".bloodlink/tokens.json")),
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}
