//! Anthropic Messages API data models
//!
//! Only the fields needed for single-turn command generation are modelled

use serde::{Deserialize, Serialize};

/// Messages API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// Model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature parameter
    pub temperature: f32,
    /// System prompt
    pub system: String,
    /// Conversation turns
    pub messages: Vec<Message>,
}

/// A single conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role (user/assistant)
    pub role: String,
    /// Plain text content
    pub content: String,
}

/// Messages API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Response id
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the answer
    #[serde(default)]
    pub model: Option<String>,
    /// Content blocks
    pub content: Vec<ContentBlock>,
    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Response content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type (text, tool_use, ...)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text for text blocks
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// First text carried by the content blocks
    pub fn first_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| block.text)
    }
}

/// Error envelope returned on non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error"
    #[serde(rename = "type", default)]
    pub response_type: String,
    /// Error detail
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error class, e.g. authentication_error
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
}
