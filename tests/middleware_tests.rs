//! Middleware module tests

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use nlcmd::config::Settings;
use nlcmd::handlers::{create_router_with_state, AppState};
use nlcmd::middleware::client::{client_address, UNKNOWN_ADDRESS};
use nlcmd::middleware::logging::REQUEST_ID_HEADER;
use nlcmd::providers::HttpProviderFactory;
use nlcmd::services::{CallerId, ManualClock};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app(pairs: &[(&str, &str)]) -> (Router, Arc<AppState>) {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let settings = Settings::from_lookup(move |key| env.get(key).cloned()).unwrap();
    let factory = HttpProviderFactory::new(settings.providers.clone()).unwrap();
    let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    let state = Arc::new(AppState::new(settings, Arc::new(factory), clock));

    (create_router_with_state(state.clone()), state)
}

fn usage_request(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    let mut builder = Request::builder().uri("/usage").extension(ConnectInfo(addr));
    if let Some(value) = forwarded_for {
        builder = builder.header("x-forwarded-for", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[test]
fn test_client_address_resolution() {
    let peer: Option<SocketAddr> = Some("198.51.100.4:1234".parse().unwrap());
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "192.168.1.1, 10.0.0.1".parse().unwrap());

    assert_eq!(client_address(&headers, peer, false), "198.51.100.4");
    assert_eq!(client_address(&headers, peer, true), "192.168.1.1");
    assert_eq!(client_address(&HeaderMap::new(), None, true), UNKNOWN_ADDRESS);
}

#[test]
fn test_forwarded_for_unknown_is_ignored() {
    let peer: Option<SocketAddr> = Some("198.51.100.4:1234".parse().unwrap());
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "unknown".parse().unwrap());

    assert_eq!(client_address(&headers, peer, true), "198.51.100.4");
}

#[tokio::test]
async fn test_untrusted_forwarded_for_does_not_change_identity() {
    let (app, state) = create_test_app(&[]);
    let peer_id = CallerId::from_address("198.51.100.4");
    state.quota.check_and_increment(&peer_id);

    let response = app
        .oneshot(usage_request("198.51.100.4:1234", Some("192.168.1.1")))
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["used_today"], 1);
}

#[tokio::test]
async fn test_trusted_forwarded_for_sets_identity() {
    let (app, state) = create_test_app(&[("TRUST_FORWARDED_FOR", "true")]);
    let forwarded_id = CallerId::from_address("192.168.1.1");
    state.quota.check_and_increment(&forwarded_id);
    state.quota.check_and_increment(&forwarded_id);

    let response = app
        .oneshot(usage_request("198.51.100.4:1234", Some("192.168.1.1")))
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["used_today"], 2);
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let (app, _) = create_test_app(&[]);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app(&[("ALLOWED_ORIGINS", "https://app.example")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate")
                .header("origin", "https://app.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.example")
    );
}
