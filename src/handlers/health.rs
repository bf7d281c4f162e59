//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Vendors with a configured credential
    pub providers: Vec<String>,
    /// Accepted requests per caller per day
    pub daily_limit: u32,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Basic health check
///
/// Reports healthy even without credentials; generation then fails with a
/// configuration error.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    let providers = state
        .dispatcher
        .selector()
        .credentials()
        .configured()
        .into_iter()
        .map(|vendor| vendor.as_str().to_string())
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "nlcmd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            providers,
            daily_limit: state.quota.daily_limit(),
            uptime_seconds: get_uptime_seconds(),
        }),
    })
}

/// Mark the process start; later calls are no-ops
pub fn mark_started() {
    started_at();
}

fn started_at() -> Instant {
    static START_TIME: OnceLock<Instant> = OnceLock::new();
    *START_TIME.get_or_init(Instant::now)
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    started_at().elapsed().as_secs()
}
