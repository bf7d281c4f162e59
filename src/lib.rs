//! nlcmd library
//!
//! Turns natural-language requests into shell commands through Anthropic or
//! OpenAI, either directly from the command line or behind a rate-limited
//! HTTP service that keeps the API keys server-side.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, create_router_with_state, AppState};
pub use providers::{Provider, ProviderError, Vendor};
pub use services::{CallerId, Dispatcher, QuotaTracker};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
