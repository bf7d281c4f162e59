//! Server API data models

use serde::{Deserialize, Serialize};

/// POST /generate body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Natural-language request
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /generate success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated shell command
    pub command: String,
    /// Requests left today for this caller
    pub remaining_requests: i64,
}

/// GET /usage body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    pub daily_limit: u32,
    pub used_today: u32,
    pub remaining_today: i64,
    /// UTC date, YYYY-MM-DD
    pub date: String,
}
