use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Friendly name shown in log lines.
    pub name: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the JSONL data files.
    pub data_dir: Option<String>,
    /// Optional user directory file for per-email routing.
    pub user_directory: Option<String>,
    /// Email the daemon serves data for, resolved through the directory.
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub pool: Option<PoolConfig>,
    pub storage: Option<StorageConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from POOLMON_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("POOLMON_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let cfg = if Path::new(&path).exists() {
            let s = fs::read_to_string(&path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.http
            .as_ref()
            .and_then(|h| h.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    /// Data directory (default ./data)
    pub fn data_dir(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.data_dir.clone())
            .unwrap_or_else(|| "data".to_string())
    }

    pub fn user_directory(&self) -> Option<String> {
        self.storage.as_ref().and_then(|s| s.user_directory.clone())
    }

    pub fn user_email(&self) -> Option<String> {
        self.storage.as_ref().and_then(|s| s.user_email.clone())
    }

    pub fn pool_name(&self) -> String {
        self.pool
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| "piscina".to_string())
    }
}
