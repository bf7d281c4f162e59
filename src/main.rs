//! nlcmd server
//!
//! HTTP service generating shell commands with server-side API keys and a
//! per-caller daily quota

use anyhow::{Context, Result};
use nlcmd::handlers::health;
use nlcmd::utils::logging::init_logging;
use nlcmd::{create_router, Settings};
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging.level, &settings.logging.format)?;
    info!("{}", nlcmd::version_info());

    let credentials = settings.providers.credentials();
    if credentials.is_empty() {
        warn!("No provider configured. Set ANTHROPIC_API_KEY or OPENAI_API_KEY; /generate will fail until then");
    } else {
        info!("Configured providers: {:?}", credentials.configured());
    }
    info!("Daily limit: {} requests per caller", settings.quota.daily_limit);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(settings)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    health::mark_started();

    info!("nlcmd server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    info!("Generate endpoint: http://{}/generate", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
