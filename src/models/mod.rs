//! Data models module
//!
//! Request and response structures for the two vendor APIs and for the server API

pub mod anthropic;
pub mod api;
pub mod openai;
