//! Middleware module
//!
//! Caller identification and request logging

pub mod client;
pub mod logging;

pub use client::{client_address, ClientId};
pub use logging::request_logging_middleware;
