//! Provider configuration
//!
//! Credentials, model ids, endpoints and timeouts shared by the command line
//! tool and the server

use super::{env_lookup, get_or_default};
use crate::providers::{anthropic, openai, Vendor};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Per-vendor configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// API key, absent when not configured
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model id
    pub model: String,
    /// Full endpoint URL
    pub api_url: String,
}

impl std::fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Anthropic configuration
    pub anthropic: VendorConfig,
    /// OpenAI configuration
    pub openai: VendorConfig,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Total request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            anthropic: VendorConfig {
                api_key: None,
                model: anthropic::DEFAULT_MODEL.to_string(),
                api_url: anthropic::DEFAULT_API_URL.to_string(),
            },
            openai: VendorConfig {
                api_key: None,
                model: openai::DEFAULT_MODEL.to_string(),
                api_url: openai::DEFAULT_API_URL.to_string(),
            },
            connect_timeout: 10,
            request_timeout: 30,
        }
    }
}

impl ProviderSettings {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Load through a lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let settings = Self {
            anthropic: VendorConfig {
                api_key: key("ANTHROPIC_API_KEY"),
                model: get_or_default(&lookup, "ANTHROPIC_MODEL", anthropic::DEFAULT_MODEL),
                api_url: get_or_default(&lookup, "ANTHROPIC_API_URL", anthropic::DEFAULT_API_URL),
            },
            openai: VendorConfig {
                api_key: key("OPENAI_API_KEY"),
                model: get_or_default(&lookup, "OPENAI_MODEL", openai::DEFAULT_MODEL),
                api_url: get_or_default(&lookup, "OPENAI_API_URL", openai::DEFAULT_API_URL),
            },
            connect_timeout: get_or_default(&lookup, "CONNECT_TIMEOUT", "10")
                .parse()
                .context("Invalid connect timeout")?,
            request_timeout: get_or_default(&lookup, "REQUEST_TIMEOUT", "30")
                .parse()
                .context("Invalid request timeout")?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        for vendor in Vendor::ALL {
            let config = self.vendor(vendor);
            if !config.api_url.starts_with("http") {
                anyhow::bail!(
                    "Invalid {} API URL format, should start with 'http': {}",
                    vendor,
                    config.api_url
                );
            }
            if config.model.trim().is_empty() {
                anyhow::bail!("{} model cannot be empty", vendor);
            }
            if let Some(key) = &config.api_key {
                if key.contains(char::is_whitespace) {
                    anyhow::bail!("{} cannot contain whitespace characters", vendor.key_env());
                }
            }
        }

        if self.connect_timeout == 0 || self.request_timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        Ok(())
    }

    /// Configuration for one vendor
    pub fn vendor(&self, vendor: Vendor) -> &VendorConfig {
        match vendor {
            Vendor::Anthropic => &self.anthropic,
            Vendor::OpenAI => &self.openai,
        }
    }

    /// Mutable configuration for one vendor
    pub fn vendor_mut(&mut self, vendor: Vendor) -> &mut VendorConfig {
        match vendor {
            Vendor::Anthropic => &mut self.anthropic,
            Vendor::OpenAI => &mut self.openai,
        }
    }

    /// Credentials present in these settings
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.anthropic.api_key.clone(), self.openai.api_key.clone())
    }
}

/// Available provider credentials
///
/// Only presence is meaningful before a call is made.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    anthropic: Option<String>,
    openai: Option<String>,
}

impl Credentials {
    pub fn new(anthropic: Option<String>, openai: Option<String>) -> Self {
        let present = |key: Option<String>| key.filter(|k| !k.trim().is_empty());
        Self {
            anthropic: present(anthropic),
            openai: present(openai),
        }
    }

    /// Read only the API keys, ignoring every other setting
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |vendor: Vendor| lookup(vendor.key_env()).map(|v| v.trim().to_string());
        Self::new(key(Vendor::Anthropic), key(Vendor::OpenAI))
    }

    /// Credential for a vendor
    pub fn get(&self, vendor: Vendor) -> Option<&str> {
        match vendor {
            Vendor::Anthropic => self.anthropic.as_deref(),
            Vendor::OpenAI => self.openai.as_deref(),
        }
    }

    pub fn has(&self, vendor: Vendor) -> bool {
        self.get(vendor).is_some()
    }

    /// Whether no credential is configured
    pub fn is_empty(&self) -> bool {
        self.anthropic.is_none() && self.openai.is_none()
    }

    /// Configured vendors in selection order
    pub fn configured(&self) -> Vec<Vendor> {
        Vendor::ALL.into_iter().filter(|v| self.has(*v)).collect()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("anthropic", &self.has(Vendor::Anthropic))
            .field("openai", &self.has(Vendor::OpenAI))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = ProviderSettings::from_lookup(lookup(&[])).unwrap();

        assert!(settings.credentials().is_empty());
        assert_eq!(settings.anthropic.model, "claude-3-5-haiku-20241022");
        assert_eq!(settings.openai.model, "gpt-4o-mini");
        assert_eq!(settings.connect_timeout, 10);
        assert_eq!(settings.request_timeout, 30);
    }

    #[test]
    fn test_empty_key_is_absent() {
        let settings = ProviderSettings::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "  "),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        let credentials = settings.credentials();
        assert!(!credentials.has(Vendor::Anthropic));
        assert_eq!(credentials.get(Vendor::OpenAI), Some("sk-test"));
        assert_eq!(credentials.configured(), vec![Vendor::OpenAI]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ProviderSettings::from_lookup(lookup(&[("REQUEST_TIMEOUT", "0")])).is_err());
        assert!(ProviderSettings::from_lookup(lookup(&[("CONNECT_TIMEOUT", "soon")])).is_err());
        assert!(ProviderSettings::from_lookup(lookup(&[("OPENAI_API_URL", "ftp://x")])).is_err());
        assert!(ProviderSettings::from_lookup(lookup(&[("OPENAI_API_KEY", "sk bad")])).is_err());
    }

    #[test]
    fn test_credentials_survive_invalid_settings() {
        let pairs = [("OPENAI_API_KEY", " sk-test "), ("REQUEST_TIMEOUT", "soon")];

        assert!(ProviderSettings::from_lookup(lookup(&pairs)).is_err());

        let credentials = Credentials::from_lookup(lookup(&pairs));
        assert_eq!(credentials.get(Vendor::OpenAI), Some("sk-test"));
        assert!(!credentials.has(Vendor::Anthropic));
    }

    #[test]
    fn test_debug_hides_keys() {
        let credentials = Credentials::new(Some("sk-secret-value".to_string()), None);
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("sk-secret-value"));

        let settings = ProviderSettings::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "sk-secret-value")])).unwrap();
        assert!(!format!("{:?}", settings).contains("sk-secret-value"));
    }
}
