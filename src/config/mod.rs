//! Configuration management module
//!
//! Loads provider credentials and server settings from the environment and `.env` files

pub mod dotfiles;
pub mod providers;
pub mod settings;

pub use providers::{Credentials, ProviderSettings, VendorConfig};
pub use settings::{
    LoggingConfig, QuotaConfig, RequestConfig, SecurityConfig, ServerConfig, Settings,
};

/// Get a value from a lookup or fall back to a default
pub(crate) fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Read a variable from the process environment, treating empty values as unset
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
