//! Command generation handler
//!
//! POST /generate

use crate::handlers::AppState;
use crate::middleware::ClientId;
use crate::models::api::{GenerateRequest, GenerateResponse};
use crate::utils::error::{AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

/// Handle a generation request
///
/// An unparseable body is reported the same way as a missing prompt.
pub async fn handle_generate(
    State(state): State<Arc<AppState>>,
    ClientId(caller): ClientId,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected generate body: {}", rejection.body_text());
            return Err(AppError::Validation("Missing prompt".to_string()));
        }
    };

    let generated = state
        .dispatcher
        .dispatch(request.prompt.as_deref(), Some(&caller), None)
        .await?;

    let remaining_requests = generated
        .remaining
        .unwrap_or_else(|| state.quota.remaining(&caller));

    Ok(Json(GenerateResponse {
        command: generated.command,
        remaining_requests,
    }))
}
