//! Configuration management for the launchpad server

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use launchpad_sdk::{LaunchConfig, RetryPolicy, MAX_URI_LENGTH};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest content id a pinning service is expected to return
pub const MAX_CONTENT_ID_LENGTH: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ServerConfig {
    #[validate]
    pub solana: SolanaConfig,
    #[validate]
    pub storage: StorageConfig,
    #[validate]
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SolanaConfig {
    #[validate(url)]
    pub rpc_url: String,
    /// Priority fee prepended to every launch transaction
    #[validate(range(min = 1, max = 10_000_000))]
    pub compute_unit_price_micro_lamports: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StorageConfig {
    /// Endpoint accepting raw uploads
    #[validate(url)]
    pub upload_url: String,
    /// Base URL content ids are served from
    #[validate(url)]
    pub gateway_url: String,
    pub api_key: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    #[validate]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RetryConfig {
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,
    #[validate(range(min = 1, max = 60_000))]
    pub base_delay_ms: u64,
    #[validate(range(min = 1, max = 60_000))]
    pub max_delay_ms: u64,
    #[validate(range(min = 1.0, max = 10.0))]
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    /// End-to-end deadline for a single launch
    #[validate(range(min = 5, max = 300))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1, max = 100))]
    pub max_request_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            compute_unit_price_micro_lamports: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_url: "http://localhost:8081/upload".to_string(),
            gateway_url: "http://localhost:8081/content".to_string(),
            api_key: None,
            timeout_secs: 60,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
            max_delay_ms: 2_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            enable_cors: true,
            request_timeout_secs: 90,
            max_request_size_mb: 10,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

impl ServerConfig {
    /// Load and validate configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from file, leaving validation to the caller
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SOLANA_RPC_URL").filter(|v| !v.is_empty()) {
            self.solana.rpc_url = url;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.api.bind_address = format!("0.0.0.0:{}", port);
        }
        if let Some(url) = lookup("UPLOADER_URL").filter(|v| !v.is_empty()) {
            self.storage.upload_url = url;
        }
        if let Some(url) = lookup("UPLOADER_GATEWAY_URL").filter(|v| !v.is_empty()) {
            self.storage.gateway_url = url;
        }
        if let Some(key) = lookup("UPLOADER_API_KEY").filter(|v| !v.is_empty()) {
            self.storage.api_key = Some(key);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(|e| anyhow!("Invalid configuration: {}", e))?;

        self.bind_address()?;
        if self.storage.retry.base_delay_ms > self.storage.retry.max_delay_ms {
            return Err(anyhow!(
                "storage.retry.base_delay_ms ({}) exceeds max_delay_ms ({})",
                self.storage.retry.base_delay_ms,
                self.storage.retry.max_delay_ms
            ));
        }
        self.validate_gateway()?;
        Ok(())
    }

    /// Gateway URIs end up in immutable on-chain metadata
    fn validate_gateway(&self) -> Result<()> {
        let storage = &self.storage;
        if is_loopback_url(&storage.gateway_url) && !is_loopback_url(&storage.upload_url) {
            return Err(anyhow!(
                "storage.gateway_url {} is a loopback address but uploads go to {}; set UPLOADER_GATEWAY_URL",
                storage.gateway_url,
                storage.upload_url
            ));
        }

        let longest_uri = storage.gateway_url.trim_end_matches('/').len() + 1 + MAX_CONTENT_ID_LENGTH;
        if longest_uri > MAX_URI_LENGTH {
            return Err(anyhow!(
                "storage.gateway_url is {} bytes; URIs could reach {} bytes, limit is {}",
                storage.gateway_url.len(),
                longest_uri,
                MAX_URI_LENGTH
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.api
            .bind_address
            .parse()
            .map_err(|e| anyhow!("Invalid bind address {}: {}", self.api.bind_address, e))
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            retry: self.storage.retry.policy(),
            deadline: self.request_deadline(),
            compute_unit_price: self.solana.compute_unit_price_micro_lamports,
        }
    }
}

fn is_loopback_url(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or_default();
    let host = match authority.strip_prefix('[') {
        Some(v6) => v6.split(']').next().unwrap_or_default(),
        None => authority.split(':').next().unwrap_or_default(),
    };
    matches!(host, "localhost" | "::1" | "0.0.0.0") || host.starts_with("127.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        ServerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SOLANA_RPC_URL", "https://rpc.example.com"),
            ("PORT", "8080"),
            ("UPLOADER_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.solana.rpc_url, "https://rpc.example.com");
        assert_eq!(config.api.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.api_key.as_deref(), Some("secret"));
        config.validate().unwrap();
    }

    #[test]
    fn test_gateway_override_follows_upload_url() {
        let vars: HashMap<&str, &str> = [
            ("UPLOADER_URL", "https://pin.example.com/upload"),
            ("UPLOADER_GATEWAY_URL", "https://gateway.example.com/ipfs"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.gateway_url, "https://gateway.example.com/ipfs");
        config.validate().unwrap();
    }

    #[test]
    fn test_remote_uploads_with_loopback_gateway_rejected() {
        let mut config = ServerConfig::default();
        config.apply_overrides(|key| {
            (key == "UPLOADER_URL").then(|| "https://pin.example.com/upload".to_string())
        });

        assert!(config.storage.gateway_url.contains("localhost"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("UPLOADER_GATEWAY_URL"));
    }

    #[test]
    fn test_rejects_gateway_too_long_for_metadata_uri() {
        let mut config = ServerConfig::default();
        config.storage.upload_url = "https://pin.example.com/upload".to_string();
        config.storage.gateway_url = format!("https://gateway.example.com/{}", "a".repeat(120));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loopback_detection() {
        assert!(is_loopback_url("http://localhost:8081/content"));
        assert!(is_loopback_url("http://127.0.0.1/x"));
        assert!(!is_loopback_url("https://gateway.example.com/ipfs"));
        assert!(is_loopback_url("http://[::1]:8081/content"));
        assert!(!is_loopback_url("https://localhost.example.com"));
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let mut config = ServerConfig::default();
        config.storage.retry.base_delay_ms = 5_000;
        config.storage.retry.max_delay_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_launch_config_carries_deadline_and_fee() {
        let mut config = ServerConfig::default();
        config.solana.compute_unit_price_micro_lamports = Some(10_000);
        let launch = config.launch_config();
        assert_eq!(launch.deadline, Duration::from_secs(90));
        assert_eq!(launch.compute_unit_price, Some(10_000));
        assert_eq!(launch.retry.max_attempts, 3);
    }
}
