//! Anthropic adapter
//!
//! Messages API: system prompt as a top-level field, key in `x-api-key`

use super::http::VendorAdapter;
use super::prompt::{MAX_TOKENS, TEMPERATURE};
use super::Vendor;
use crate::models::anthropic::{ErrorResponse, Message, MessagesRequest, MessagesResponse};
use reqwest::RequestBuilder;

/// Default Messages API endpoint
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default model id
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter;

impl VendorAdapter for AnthropicAdapter {
    const VENDOR: Vendor = Vendor::Anthropic;

    type Request = MessagesRequest;
    type Response = MessagesResponse;

    fn build_request(model: &str, system: &str, user: &str) -> MessagesRequest {
        MessagesRequest {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        }
    }

    fn authorize(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
    }

    fn first_text(response: MessagesResponse) -> Option<String> {
        response.first_text()
    }

    fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .map(|e| e.error.message)
    }
}
