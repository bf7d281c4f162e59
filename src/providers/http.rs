//! HTTP provider
//!
//! One request/response path for every vendor. The vendor-specific parts
//! (body shape, auth headers, where the text lives) are supplied by a
//! [`VendorAdapter`].

use super::prompt::{user_message, SYSTEM_PROMPT};
use super::{AnthropicAdapter, OpenAIAdapter, Provider, ProviderError, Vendor};
use crate::config::ProviderSettings;
use crate::utils::logging::truncate_content;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Vendor-specific request and response handling
pub trait VendorAdapter: Send + Sync + 'static {
    /// Vendor served by this adapter
    const VENDOR: Vendor;

    /// Serialized request body
    type Request: Serialize + Send + Sync;

    /// Deserialized success body
    type Response: DeserializeOwned;

    /// Build the request body
    fn build_request(model: &str, system: &str, user: &str) -> Self::Request;

    /// Attach authentication headers
    fn authorize(builder: RequestBuilder, api_key: &str) -> RequestBuilder;

    /// Extract the first generated text
    fn first_text(response: Self::Response) -> Option<String>;

    /// Extract the error message from a non-success body
    fn error_message(body: &str) -> Option<String>;
}

/// Provider speaking JSON over HTTPS through an adapter
pub struct HttpProvider<A> {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
    timeout_secs: u64,
    _adapter: PhantomData<fn() -> A>,
}

impl<A: VendorAdapter> HttpProvider<A> {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            api_url: api_url.into(),
            timeout_secs,
            _adapter: PhantomData,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                vendor: A::VENDOR,
                after: Duration::from_secs(self.timeout_secs),
            }
        } else {
            ProviderError::Transport {
                vendor: A::VENDOR,
                message: e.to_string(),
            }
        }
    }
}

/// Message used when the error body has no recognizable shape
fn status_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        truncate_content(body, 200)
    }
}

#[async_trait]
impl<A: VendorAdapter> Provider for HttpProvider<A> {
    fn vendor(&self) -> Vendor {
        A::VENDOR
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let vendor = A::VENDOR;
        let body = A::build_request(&self.model, SYSTEM_PROMPT, &user_message(prompt));

        debug!("Sending {} completion request (model: {})", vendor, self.model);

        let response = A::authorize(self.client.post(&self.api_url), &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = A::error_message(&text).unwrap_or_else(|| status_message(status, &text));
            error!("{} API request failed: {} - {}", vendor, status, message);
            return Err(ProviderError::Status {
                vendor,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: A::Response = serde_json::from_str(&text).map_err(|e| ProviderError::Malformed {
            vendor,
            message: format!("Failed to parse response: {}", e),
        })?;

        let command = A::first_text(parsed)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::Malformed {
                vendor,
                message: "response contained no text".to_string(),
            })?;

        debug!("{} request completed successfully", vendor);
        Ok(command)
    }
}

/// Creates provider clients for a vendor and credential
pub trait ProviderFactory: Send + Sync {
    fn create(&self, vendor: Vendor, api_key: &str) -> Arc<dyn Provider>;
}

/// Factory producing [`HttpProvider`]s that share one connection pool
#[derive(Clone)]
pub struct HttpProviderFactory {
    client: Client,
    settings: ProviderSettings,
}

impl HttpProviderFactory {
    /// Build the shared HTTP client with explicit connect and request timeouts
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .timeout(Duration::from_secs(settings.request_timeout))
            .user_agent(concat!("nlcmd/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, settings })
    }

    /// Override the model for one vendor
    pub fn with_model(mut self, vendor: Vendor, model: impl Into<String>) -> Self {
        self.settings.vendor_mut(vendor).model = model.into();
        self
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, vendor: Vendor, api_key: &str) -> Arc<dyn Provider> {
        let config = self.settings.vendor(vendor);
        let timeout = self.settings.request_timeout;

        match vendor {
            Vendor::Anthropic => Arc::new(HttpProvider::<AnthropicAdapter>::new(
                self.client.clone(),
                api_key,
                &config.model,
                &config.api_url,
                timeout,
            )),
            Vendor::OpenAI => Arc::new(HttpProvider::<OpenAIAdapter>::new(
                self.client.clone(),
                api_key,
                &config.model,
                &config.api_url,
                timeout,
            )),
        }
    }
}
