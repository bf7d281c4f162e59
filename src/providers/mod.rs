//! Provider module
//!
//! Defines the Provider trait, the vendor identities and the HTTP provider
//! built on per-vendor adapters

pub mod anthropic;
pub mod http;
pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Upstream LLM vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Anthropic,
    OpenAI,
}

impl Vendor {
    /// All vendors in selection order
    pub const ALL: [Vendor; 2] = [Vendor::Anthropic, Vendor::OpenAI];

    /// Lowercase identifier used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "anthropic",
            Vendor::OpenAI => "openai",
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "Anthropic",
            Vendor::OpenAI => "OpenAI",
        }
    }

    /// Environment variable holding this vendor's credential
    pub fn key_env(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "ANTHROPIC_API_KEY",
            Vendor::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// The other vendor
    pub fn other(&self) -> Vendor {
        match self {
            Vendor::Anthropic => Vendor::OpenAI,
            Vendor::OpenAI => Vendor::Anthropic,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Vendor::Anthropic),
            "openai" | "gpt" => Ok(Vendor::OpenAI),
            other => Err(format!(
                "Unknown provider '{}'. Use 'anthropic' or 'openai'.",
                other
            )),
        }
    }
}

/// Failure of a single vendor call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Connection or transport failure
    #[error("{vendor} request failed: {message}")]
    Transport { vendor: Vendor, message: String },

    /// Non-success HTTP status
    #[error("{vendor} API error ({status}): {message}")]
    Status {
        vendor: Vendor,
        status: u16,
        message: String,
    },

    /// Success status but the payload did not have the expected shape
    #[error("{vendor} returned an unexpected response: {message}")]
    Malformed { vendor: Vendor, message: String },

    /// Deadline exceeded
    #[error("{vendor} request timed out after {after:?}")]
    Timeout { vendor: Vendor, after: Duration },
}

impl ProviderError {
    /// Vendor that produced the error
    pub fn vendor(&self) -> Vendor {
        match self {
            ProviderError::Transport { vendor, .. }
            | ProviderError::Status { vendor, .. }
            | ProviderError::Malformed { vendor, .. }
            | ProviderError::Timeout { vendor, .. } => *vendor,
        }
    }
}

/// Capability shared by every vendor client
#[async_trait]
pub trait Provider: Send + Sync {
    /// Vendor behind this client
    fn vendor(&self) -> Vendor;

    /// Model id sent upstream
    fn model(&self) -> &str;

    /// Turn a natural-language request into a shell command
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub use anthropic::AnthropicAdapter;
pub use http::{HttpProvider, HttpProviderFactory, ProviderFactory, VendorAdapter};
pub use openai::OpenAIAdapter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_parsing() {
        assert_eq!("anthropic".parse::<Vendor>(), Ok(Vendor::Anthropic));
        assert_eq!("Claude".parse::<Vendor>(), Ok(Vendor::Anthropic));
        assert_eq!("openai".parse::<Vendor>(), Ok(Vendor::OpenAI));
        assert_eq!(" GPT ".parse::<Vendor>(), Ok(Vendor::OpenAI));
        assert!("gemini".parse::<Vendor>().is_err());
    }

    #[test]
    fn test_vendor_other() {
        assert_eq!(Vendor::Anthropic.other(), Vendor::OpenAI);
        assert_eq!(Vendor::OpenAI.other(), Vendor::Anthropic);
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Status {
            vendor: Vendor::OpenAI,
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.to_string(), "OpenAI API error (401): Incorrect API key provided");
        assert_eq!(err.vendor(), Vendor::OpenAI);

        let err = ProviderError::Timeout {
            vendor: Vendor::Anthropic,
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "Anthropic request timed out after 30s");

        let err = ProviderError::Timeout {
            vendor: Vendor::OpenAI,
            after: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "OpenAI request timed out after 250ms");
    }
}
