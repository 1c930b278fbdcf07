use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default; startup fails only on values that don't parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Flat directory holding every generated artifact.
    pub output_dir: PathBuf,
    /// Prefix for absolute download URLs, without a trailing slash.
    pub public_base_url: String,
    /// `None` keeps artifacts forever.
    pub artifact_ttl: Option<Duration>,
    pub sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let ttl_secs = parse_secs("ARTIFACT_TTL_SECS", 86_400)?;
        let sweep_secs = parse_secs("SWEEP_INTERVAL_SECS", 3_600)?.max(1);

        Ok(Config {
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            output_dir: PathBuf::from(
                std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "outputs".to_string()),
            ),
            public_base_url: normalize_base_url(&public_base_url),
            artifact_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }

    /// Absolute URL of the download route for `filename`.
    pub fn download_url(&self, filename: &str) -> String {
        format!("{}/download/{filename}", self.public_base_url)
    }
}

fn parse_secs(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        Err(_) => Ok(default),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
