//! Quota usage handlers

use crate::handlers::AppState;
use crate::middleware::ClientId;
use crate::models::api::UsageResponse;
use crate::services::{CallerId, UsageSnapshot};
use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

impl From<UsageSnapshot> for UsageResponse {
    fn from(snapshot: UsageSnapshot) -> Self {
        Self {
            daily_limit: snapshot.daily_limit,
            used_today: snapshot.used,
            remaining_today: snapshot.remaining,
            date: snapshot.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// GET /usage
///
/// Usage for the requesting caller
pub async fn own_usage(
    State(state): State<Arc<AppState>>,
    ClientId(caller): ClientId,
) -> Json<UsageResponse> {
    Json(state.quota.usage(&caller).into())
}

/// GET /usage/:token
///
/// The token is an already-hashed caller identifier, as used by the quota.
pub async fn token_usage(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Json<UsageResponse> {
    let caller = CallerId::from_token(token);
    Json(state.quota.usage(&caller).into())
}
