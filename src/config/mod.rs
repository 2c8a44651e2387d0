//! Configuration module - environment variable parsing

pub mod maps;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origin for CORS ("*" allows any)
    pub client_origin: String,
    /// Path to the per-map zone coordinates file
    pub map_config_path: PathBuf,
    /// Map to load at startup, if any
    pub startup_map: Option<String>,
    /// Seconds of uncontested presence needed to capture a zone
    pub capture_seconds: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        };

        let capture_seconds = match env::var("CAPTURE_SECONDS") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or(ConfigError::InvalidCaptureSeconds(raw))?,
            Err(_) => 10,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            client_origin: env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".to_string()),

            map_config_path: env::var("MAP_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/map_coordinates.json")),

            startup_map: env::var("STARTUP_MAP").ok(),

            capture_seconds,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("CAPTURE_SECONDS must be a positive integer, got '{0}'")]
    InvalidCaptureSeconds(String),
}
