//! Caller identification
//!
//! Derives the quota key for a request from its network address

use crate::handlers::AppState;
use crate::services::CallerId;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Address used when neither the socket nor trusted headers identify the caller
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Hashed identity of the requesting client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub CallerId);

/// Resolve the caller's address
///
/// Forwarding headers are only honored when the server sits behind a trusted
/// proxy; otherwise any client could pick its own quota key.
pub fn client_address(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_address(headers) {
            return ip;
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
}

fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    // X-Forwarded-For may contain multiple IPs, take the first one
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    forwarded
        .into_iter()
        .chain(real_ip)
        .find(|ip| !ip.is_empty() && *ip != UNKNOWN_ADDRESS)
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let address = client_address(
            &parts.headers,
            peer,
            state.settings.security.trust_forwarded_for,
        );
        let id = CallerId::from_address(&address);

        debug!("Resolved caller {}", id);
        Ok(ClientId(id))
    }
}
