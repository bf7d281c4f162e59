//! Provider selection
//!
//! Picks the vendor client for a request from the configured credentials

use crate::config::Credentials;
use crate::providers::{Provider, ProviderFactory, Vendor};
use crate::utils::error::{AppError, AppResult};
use std::sync::Arc;
use tracing::debug;

/// Vendor chosen when both credentials exist and nothing is preferred
pub const DEFAULT_VENDOR: Vendor = Vendor::Anthropic;

/// Resolve the primary vendor
///
/// An explicit preference wins when its credential is present and fails
/// otherwise, even if the other vendor is configured.
pub fn select_vendor(credentials: &Credentials, preferred: Option<Vendor>) -> AppResult<Vendor> {
    if let Some(vendor) = preferred {
        return if credentials.has(vendor) {
            Ok(vendor)
        } else {
            Err(AppError::Config(format!("{} is not set", vendor.key_env())))
        };
    }

    [DEFAULT_VENDOR, DEFAULT_VENDOR.other()]
        .into_iter()
        .find(|vendor| credentials.has(*vendor))
        .ok_or_else(|| {
            AppError::Config(
                "No provider configured. Set ANTHROPIC_API_KEY or OPENAI_API_KEY".to_string(),
            )
        })
}

/// Builds provider clients for the configured credentials
pub struct ProviderSelector {
    credentials: Credentials,
    factory: Arc<dyn ProviderFactory>,
}

impl ProviderSelector {
    pub fn new(credentials: Credentials, factory: Arc<dyn ProviderFactory>) -> Self {
        Self { credentials, factory }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Client for the primary vendor
    pub fn select(&self, preferred: Option<Vendor>) -> AppResult<Arc<dyn Provider>> {
        let vendor = select_vendor(&self.credentials, preferred)?;
        let api_key = self
            .credentials
            .get(vendor)
            .ok_or_else(|| AppError::Config(format!("{} is not set", vendor.key_env())))?;

        debug!("Selected {} as primary provider", vendor);
        Ok(self.factory.create(vendor, api_key))
    }

    /// Client for the other vendor, if its credential is present
    pub fn fallback_for(&self, primary: Vendor) -> Option<Arc<dyn Provider>> {
        let vendor = primary.other();
        self.credentials
            .get(vendor)
            .map(|api_key| self.factory.create(vendor, api_key))
    }
}
