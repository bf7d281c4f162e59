//! Server settings
//!
//! Defines all server configuration structures and loading logic

use super::{env_lookup, get_or_default, ProviderSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream provider configuration
    pub providers: ProviderSettings,
    /// Daily quota configuration
    pub quota: QuotaConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Daily quota configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Accepted requests per caller per UTC day
    pub daily_limit: u32,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Deadline for each upstream call in seconds
    pub timeout: u64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
    /// Derive caller identity from X-Forwarded-For (only behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from `.env` and the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(env_lookup)
    }

    /// Create a configuration instance through a lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let providers = ProviderSettings::from_lookup(&lookup)?;
        let request_timeout = providers.request_timeout;

        let settings = Self {
            server: ServerConfig {
                host: get_or_default(&lookup, "SERVER_HOST", "0.0.0.0"),
                port: get_or_default(&lookup, "SERVER_PORT", "5001")
                    .parse()
                    .context("Invalid port number")?,
            },
            providers,
            quota: QuotaConfig {
                daily_limit: get_or_default(&lookup, "DAILY_LIMIT", "50")
                    .parse()
                    .context("Invalid daily limit")?,
            },
            request: RequestConfig {
                max_request_size: get_or_default(&lookup, "MAX_REQUEST_SIZE", "65536")
                    .parse()
                    .context("Invalid maximum request size")?,
                timeout: request_timeout,
            },
            security: SecurityConfig {
                allowed_origins: get_or_default(&lookup, "ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                cors_enabled: get_or_default(&lookup, "CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
                trust_forwarded_for: get_or_default(&lookup, "TRUST_FORWARDED_FOR", "false")
                    .parse()
                    .context("Invalid trust forwarded-for flag")?,
            },
            logging: LoggingConfig {
                level: get_or_default(&lookup, "RUST_LOG", "info"),
                format: get_or_default(&lookup, "LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if self.quota.daily_limit == 0 {
            anyhow::bail!("Daily limit cannot be 0");
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        if self.security.cors_enabled && self.security.allowed_origins.is_empty() {
            anyhow::bail!("ALLOWED_ORIGINS cannot be empty when CORS is enabled");
        }

        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log level: {}", self.logging.level))?;

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 5001);
        assert_eq!(settings.quota.daily_limit, 50);
        assert_eq!(settings.request.timeout, 30);
        assert!(settings.security.cors_enabled);
        assert!(!settings.security.trust_forwarded_for);
        assert_eq!(settings.logging.format, "text");
    }

    #[test]
    fn test_request_deadline_follows_provider_timeout() {
        let settings = settings_from(&[("REQUEST_TIMEOUT", "12")]).unwrap();
        assert_eq!(settings.request.timeout, 12);
        assert_eq!(settings.providers.request_timeout, 12);
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = settings_from(&[("DAILY_LIMIT", "0")]).unwrap_err();
        assert!(err.to_string().contains("Daily limit cannot be 0"));
    }

    #[test]
    fn test_rejects_bad_log_format() {
        assert!(settings_from(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
