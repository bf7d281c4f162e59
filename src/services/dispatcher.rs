//! Request dispatcher
//!
//! Runs one generation request through quota, provider selection, the primary
//! call and at most one fallback call to the other vendor.

use super::quota::{CallerId, QuotaTracker};
use super::selector::ProviderSelector;
use crate::providers::{Provider, ProviderError, Vendor};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::{truncate_content, MAX_LOGGED_PROMPT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Successful dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Trimmed command text
    pub command: String,
    /// Vendor that produced the command
    pub vendor: Vendor,
    /// Requests left today, when a quota applies
    pub remaining: Option<i64>,
    /// Whether the primary vendor failed and the other one answered
    pub fell_back: bool,
}

pub struct Dispatcher {
    selector: ProviderSelector,
    quota: Option<Arc<QuotaTracker>>,
    deadline: Duration,
}

impl Dispatcher {
    /// Dispatcher without a quota (command line use)
    pub fn new(selector: ProviderSelector, deadline: Duration) -> Self {
        Self {
            selector,
            quota: None,
            deadline,
        }
    }

    /// Enforce a daily quota on every caller
    pub fn with_quota(mut self, quota: Arc<QuotaTracker>) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn selector(&self) -> &ProviderSelector {
        &self.selector
    }

    /// Turn a prompt into a command
    pub async fn dispatch(
        &self,
        prompt: Option<&str>,
        caller: Option<&CallerId>,
        preferred: Option<Vendor>,
    ) -> AppResult<Generated> {
        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("Missing prompt".to_string()))?;

        debug!("Dispatching prompt: {}", truncate_content(prompt, MAX_LOGGED_PROMPT));

        if let (Some(quota), Some(caller)) = (&self.quota, caller) {
            if !quota.check_and_increment(caller) {
                warn!("Daily limit reached for caller {}", caller);
                return Err(AppError::RateLimit {
                    limit: quota.daily_limit(),
                });
            }
        }

        let primary = self.selector.select(preferred)?;
        let primary_vendor = primary.vendor();

        let (command, vendor, fell_back) = match self.call(primary.as_ref(), prompt).await {
            Ok(command) => (command, primary_vendor, false),
            Err(primary_err) => {
                warn!("Primary provider failed: {}", primary_err);

                let fallback = self.selector.fallback_for(primary_vendor).ok_or_else(|| {
                    AppError::Upstream(primary_err.to_string())
                })?;
                let fallback_vendor = fallback.vendor();
                info!("Falling back from {} to {}", primary_vendor, fallback_vendor);

                match self.call(fallback.as_ref(), prompt).await {
                    Ok(command) => (command, fallback_vendor, true),
                    Err(fallback_err) => {
                        warn!("Fallback provider failed: {}", fallback_err);
                        return Err(AppError::Upstream(format!(
                            "Both providers failed: {}",
                            fallback_err
                        )));
                    }
                }
            }
        };

        let remaining = match (&self.quota, caller) {
            (Some(quota), Some(caller)) => Some(quota.remaining(caller)),
            _ => None,
        };

        info!("Generated command via {} (fallback: {})", vendor, fell_back);

        Ok(Generated {
            command,
            vendor,
            remaining,
            fell_back,
        })
    }

    async fn call(&self, provider: &dyn Provider, prompt: &str) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.deadline, provider.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                vendor: provider.vendor(),
                after: self.deadline,
            }),
        }
    }
}
