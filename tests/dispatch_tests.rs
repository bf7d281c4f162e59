//! Dispatch tests against mocked vendor APIs
//!
//! Exercises the same path the command line tool takes: real HTTP providers,
//! no quota.

use httpmock::prelude::*;
use nlcmd::config::ProviderSettings;
use nlcmd::providers::{HttpProviderFactory, Vendor};
use nlcmd::services::{Dispatcher, ProviderSelector};
use nlcmd::AppError;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const ANTHROPIC_PATH: &str = "/v1/messages";
const OPENAI_PATH: &str = "/v1/chat/completions";

fn provider_settings(server: &MockServer, pairs: &[(&str, &str)]) -> ProviderSettings {
    let mut env: HashMap<String, String> = HashMap::from([
        ("ANTHROPIC_API_URL".to_string(), server.url(ANTHROPIC_PATH)),
        ("OPENAI_API_URL".to_string(), server.url(OPENAI_PATH)),
    ]);
    for (k, v) in pairs {
        env.insert(k.to_string(), v.to_string());
    }
    ProviderSettings::from_lookup(move |key| env.get(key).cloned()).unwrap()
}

fn dispatcher(settings: ProviderSettings, factory: HttpProviderFactory) -> Dispatcher {
    let selector = ProviderSelector::new(settings.credentials(), Arc::new(factory));
    Dispatcher::new(selector, Duration::from_secs(settings.request_timeout))
}

fn build(server: &MockServer, pairs: &[(&str, &str)]) -> Dispatcher {
    let settings = provider_settings(server, pairs);
    let factory = HttpProviderFactory::new(settings.clone()).unwrap();
    dispatcher(settings, factory)
}

#[tokio::test]
async fn test_single_openai_credential() {
    let server = MockServer::start_async().await;
    let anthropic = server
        .mock_async(|when, then| {
            when.method(POST).path(ANTHROPIC_PATH);
            then.status(200);
        })
        .await;
    let openai = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(OPENAI_PATH)
                .header("authorization", "Bearer sk-test")
                .json_body_partial(r#"{"model": "gpt-4o-mini", "max_tokens": 200}"#);
            then.status(200).json_body(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": " find . -size +100M -type f\n"}}]
            }));
        })
        .await;

    let dispatcher = build(&server, &[("OPENAI_API_KEY", "sk-test")]);
    let generated = dispatcher.dispatch(Some("find large files"), None, None).await.unwrap();

    assert_eq!(generated.command, "find . -size +100M -type f");
    assert_eq!(generated.vendor, Vendor::OpenAI);
    assert_eq!(generated.remaining, None);
    assert_eq!(openai.hits_async().await, 1);
    assert_eq!(anthropic.hits_async().await, 0);
}

#[tokio::test]
async fn test_double_failure_makes_two_calls() {
    let server = MockServer::start_async().await;
    let anthropic = server
        .mock_async(|when, then| {
            when.method(POST).path(ANTHROPIC_PATH);
            then.status(500).json_body(json!({
                "type": "error",
                "error": {"type": "api_error", "message": "Internal server error"}
            }));
        })
        .await;
    let openai = server
        .mock_async(|when, then| {
            when.method(POST).path(OPENAI_PATH);
            then.status(429).json_body(json!({
                "error": {"message": "Rate limit reached for gpt-4o-mini", "type": "requests"}
            }));
        })
        .await;

    let dispatcher = build(
        &server,
        &[("ANTHROPIC_API_KEY", "sk-ant-test"), ("OPENAI_API_KEY", "sk-test")],
    );
    let err = dispatcher.dispatch(Some("git push"), None, None).await.unwrap_err();

    match err {
        AppError::Upstream(message) => {
            assert!(message.contains("Rate limit reached for gpt-4o-mini"));
        }
        other => panic!("Expected upstream error, got {:?}", other),
    }
    assert_eq!(anthropic.hits_async().await, 1);
    assert_eq!(openai.hits_async().await, 1);
}

#[tokio::test]
async fn test_malformed_primary_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ANTHROPIC_PATH);
            then.status(200).json_body(json!({"content": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(OPENAI_PATH);
            then.status(200).json_body(json!({
                "choices": [{"message": {"content": "git push"}}]
            }));
        })
        .await;

    let dispatcher = build(
        &server,
        &[("ANTHROPIC_API_KEY", "sk-ant-test"), ("OPENAI_API_KEY", "sk-test")],
    );
    let generated = dispatcher.dispatch(Some("git push"), None, None).await.unwrap();

    assert_eq!(generated.command, "git push");
    assert!(generated.fell_back);
}

#[tokio::test]
async fn test_preferred_vendor_without_key_makes_no_calls() {
    let server = MockServer::start_async().await;
    let openai = server
        .mock_async(|when, then| {
            when.method(POST).path(OPENAI_PATH);
            then.status(200);
        })
        .await;

    let dispatcher = build(&server, &[("OPENAI_API_KEY", "sk-test")]);
    let err = dispatcher
        .dispatch(Some("git push"), None, Some(Vendor::Anthropic))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Config(ref m) if m == "ANTHROPIC_API_KEY is not set"));
    assert_eq!(openai.hits_async().await, 0);
}

#[tokio::test]
async fn test_model_override_applies_to_primary_only() {
    let server = MockServer::start_async().await;
    let anthropic = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ANTHROPIC_PATH)
                .json_body_partial(r#"{"model": "claude-3-opus-latest"}"#);
            then.status(503).body("");
        })
        .await;
    let openai = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(OPENAI_PATH)
                .json_body_partial(r#"{"model": "gpt-4o-mini"}"#);
            then.status(200).json_body(json!({
                "choices": [{"message": {"content": "uptime"}}]
            }));
        })
        .await;

    let settings = provider_settings(
        &server,
        &[("ANTHROPIC_API_KEY", "sk-ant-test"), ("OPENAI_API_KEY", "sk-test")],
    );
    let factory = HttpProviderFactory::new(settings.clone())
        .unwrap()
        .with_model(Vendor::Anthropic, "claude-3-opus-latest");
    let dispatcher = dispatcher(settings, factory);

    let generated = dispatcher.dispatch(Some("how long up"), None, None).await.unwrap();

    assert_eq!(generated.command, "uptime");
    assert_eq!(anthropic.hits_async().await, 1);
    assert_eq!(openai.hits_async().await, 1);
}

#[tokio::test]
async fn test_slow_primary_hits_deadline() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(OPENAI_PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"choices": [{"message": {"content": "ls"}}]}));
        })
        .await;

    let settings = provider_settings(&server, &[("OPENAI_API_KEY", "sk-test")]);
    let factory = HttpProviderFactory::new(settings.clone()).unwrap();
    let selector = ProviderSelector::new(settings.credentials(), Arc::new(factory));
    let dispatcher = Dispatcher::new(selector, Duration::from_millis(200));

    let err = dispatcher.dispatch(Some("ls"), None, None).await.unwrap_err();

    assert!(matches!(err, AppError::Upstream(ref m) if m.contains("timed out")));
}
