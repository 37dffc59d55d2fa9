//! Frontend configuration, read from environment variables with defaults.

use std::time::Duration;

/// Public pages reuse fetched data for an hour unless configured otherwise.
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Backend origin, without the `/api` suffix.
    pub api_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub revalidate_secs: u64,
    pub request_timeout_secs: Option<u64>,
    /// Directory holding the file-backed local store.
    pub data_dir: String,
    /// Days a local store entry survives without being rewritten.
    pub store_retention_days: i64,
    pub log_dir: String,
    /// Overrides the environment's default level (`debug`, or `info` in production).
    pub log_level: Option<String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3001".to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            revalidate_secs: std::env::var("REVALIDATE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REVALIDATE_SECS),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            store_retention_days: std::env::var("STORE_RETENTION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(crate::store::DEFAULT_RETENTION_DAYS),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: std::env::var("LOG_LEVEL").ok().filter(|l| !l.is_empty()),
        }
    }
}

impl FrontendConfig {
    /// Base URL every backend path is joined onto.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url.trim_end_matches('/'))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.is_production() => "info",
            None => "debug",
        }
    }

    /// Path of the file-backed local store.
    pub fn store_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("store.json")
    }

    pub fn store_retention(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.store_retention_days)
            .unwrap_or_else(|| chrono::Duration::days(crate::store::DEFAULT_RETENTION_DAYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_env_or_fallback() {
        let config = FrontendConfig::default();
        assert!(!config.api_url.is_empty());
        assert!(!config.data_dir.is_empty());
        assert!(config.port >= 1);
    }

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = FrontendConfig {
            api_url: "http://backend:3001/".to_string(),
            ..FrontendConfig::default()
        };
        assert_eq!(config.api_base(), "http://backend:3001/api");
    }

    #[test]
    fn test_log_level_defaults_by_environment() {
        let config = FrontendConfig {
            environment: "production".to_string(),
            log_level: None,
            ..FrontendConfig::default()
        };
        assert_eq!(config.log_level(), "info");

        let config = FrontendConfig {
            environment: "development".to_string(),
            log_level: Some("warn".to_string()),
            ..FrontendConfig::default()
        };
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn test_revalidate_window() {
        let config = FrontendConfig {
            revalidate_secs: 60,
            ..FrontendConfig::default()
        };
        assert_eq!(config.revalidate(), Duration::from_secs(60));
    }

    #[test]
    fn test_store_retention_in_days() {
        let config = FrontendConfig {
            store_retention_days: 7,
            ..FrontendConfig::default()
        };
        assert_eq!(config.store_retention(), chrono::Duration::days(7));

        let overflow = FrontendConfig {
            store_retention_days: i64::MAX,
            ..FrontendConfig::default()
        };
        assert_eq!(
            overflow.store_retention(),
            chrono::Duration::days(crate::store::DEFAULT_RETENTION_DAYS)
        );
    }
}
