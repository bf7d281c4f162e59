//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod generate;
pub mod health;
pub mod usage;

use crate::config::{SecurityConfig, Settings};
use crate::middleware::request_logging_middleware;
use crate::providers::{HttpProviderFactory, ProviderFactory};
use crate::services::{Clock, Dispatcher, ProviderSelector, QuotaTracker, SystemClock};
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Application state
pub struct AppState {
    pub settings: Settings,
    pub dispatcher: Dispatcher,
    pub quota: Arc<QuotaTracker>,
}

impl AppState {
    /// Wire the dispatcher and quota tracker from settings
    pub fn new(settings: Settings, factory: Arc<dyn ProviderFactory>, clock: Arc<dyn Clock>) -> Self {
        let quota = Arc::new(QuotaTracker::with_clock(settings.quota.daily_limit, clock));
        let selector = ProviderSelector::new(settings.providers.credentials(), factory);
        let dispatcher = Dispatcher::new(selector, Duration::from_secs(settings.request.timeout))
            .with_quota(quota.clone());

        Self {
            settings,
            dispatcher,
            quota,
        }
    }
}

/// Create application router
pub fn create_router(settings: Settings) -> Result<Router> {
    let factory = HttpProviderFactory::new(settings.providers.clone())?;
    let state = AppState::new(settings, Arc::new(factory), Arc::new(SystemClock));

    Ok(create_router_with_state(Arc::new(state)))
}

/// Create the router around prepared state
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.security);

    // Checked by the body extractors; overflow reaches the handler as a JsonRejection
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(DefaultBodyLimit::max(state.settings.request.max_request_size));

    let router = Router::new()
        .route("/generate", post(generate::handle_generate))
        .route("/health", get(health::health_check))
        .route("/usage", get(usage::own_usage))
        .route("/usage/:token", get(usage::token_usage))
        .with_state(state)
        .layer(middleware_stack);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.cors_enabled {
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if security.allowed_origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}
