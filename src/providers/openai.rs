//! OpenAI adapter
//!
//! Chat Completions API: system prompt as the first message, Bearer auth

use super::http::VendorAdapter;
use super::prompt::{MAX_TOKENS, TEMPERATURE};
use super::Vendor;
use crate::models::openai::{ChatMessage, ChatRequest, ChatResponse, ErrorResponse};
use reqwest::RequestBuilder;

/// Default Chat Completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model id
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAIAdapter;

impl VendorAdapter for OpenAIAdapter {
    const VENDOR: Vendor = Vendor::OpenAI;

    type Request = ChatRequest;
    type Response = ChatResponse;

    fn build_request(model: &str, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    fn authorize(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder.bearer_auth(api_key)
    }

    fn first_text(response: ChatResponse) -> Option<String> {
        response.first_text()
    }

    fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .map(|e| e.error.message)
    }
}
