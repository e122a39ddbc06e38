//! Retry and fallback behaviour across the two endpoints

use super::mock_server::{
    spawn_slow_endpoint, MockServerFixture, API_KEY, FALLBACK_PATH, PRIMARY_PATH,
};
use mockito::Matcher;
use std::time::{Duration, Instant};
use tarot_reader::transport::{TransportConfig, TransportError};
use tarot_reader::{Error, ErrorKind, InterpretationClientBuilder, RetryPolicy};

fn short_timeouts() -> TransportConfig {
    TransportConfig {
        request_timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    }
}

#[tokio::test]
async fn test_primary_success_returns_text() {
    let fixture = MockServerFixture::new().await;
    let primary = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", PRIMARY_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
            .match_header("content-type", "application/json; charset=utf-8")
            .match_body(Matcher::Json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "test prompt" }] }]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"你好"}]}}]}"#)
            .expect(1)
            .create_async()
            .await
    };
    let fallback = fixture.mock_success(FALLBACK_PATH, "unused", 0).await;

    let client = fixture.client();
    let text = client.get_interpretation("test prompt").await.unwrap();

    assert_eq!(text, "你好");
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_primary_exhausted_then_fallback_succeeds() {
    let fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_reply(PRIMARY_PATH, 500, r#"{"error":"boom"}"#, 2)
        .await;
    let fallback = fixture.mock_success(FALLBACK_PATH, "本週財運穩健。", 1).await;

    let client = fixture.client();
    let start = Instant::now();
    let text = client.get_interpretation("請問我本週的財運？").await.unwrap();

    assert_eq!(text, "本週財運穩健。");
    // one backoff wait between the two primary attempts
    assert!(start.elapsed() >= Duration::from_millis(350));
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_retry_then_success_on_primary() {
    let fixture = MockServerFixture::new().await;
    let failing = fixture.mock_reply(PRIMARY_PATH, 503, "busy", 1).await;
    let succeeding = fixture.mock_success(PRIMARY_PATH, "第二次成功", 1).await;
    let fallback = fixture.mock_success(FALLBACK_PATH, "unused", 0).await;

    let client = fixture.client();
    let start = Instant::now();
    let text = client.get_interpretation("test prompt").await.unwrap();

    assert_eq!(text, "第二次成功");
    assert!(start.elapsed() >= Duration::from_millis(350));
    failing.assert_async().await;
    succeeding.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_both_endpoints_fail_surfaces_fallback_error() {
    let fixture = MockServerFixture::new().await;
    let primary = fixture.mock_reply(PRIMARY_PATH, 500, "primary down", 2).await;
    let fallback = fixture
        .mock_reply(FALLBACK_PATH, 503, "fallback down", 2)
        .await;

    let client = fixture.fast_client();
    let err = client.get_interpretation("test prompt").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransientCallFailure);
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("fallback down"));
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_malformed_primary_falls_back() {
    let fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_reply(PRIMARY_PATH, 200, r#"{"candidates":[]}"#, 2)
        .await;
    let fallback = fixture.mock_success(FALLBACK_PATH, "備援回覆", 1).await;

    let client = fixture.fast_client();
    let text = client.get_interpretation("test prompt").await.unwrap();

    assert_eq!(text, "備援回覆");
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_primary_falls_back() {
    let fixture = MockServerFixture::new().await;
    let fallback = fixture.mock_success(FALLBACK_PATH, "備援回覆", 1).await;

    let client = InterpretationClientBuilder::new()
        .api_key(API_KEY)
        .primary_url("http://127.0.0.1:1/v1beta/models/primary:generateContent")
        .fallback_url(fixture.url(FALLBACK_PATH))
        .retry_policy(RetryPolicy::new(2, Duration::from_millis(10)))
        .build()
        .unwrap();
    let text = client.get_interpretation("test prompt").await.unwrap();

    assert_eq!(text, "備援回覆");
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_custom_attempt_count() {
    let fixture = MockServerFixture::new().await;
    let primary = fixture.mock_reply(PRIMARY_PATH, 502, "bad gateway", 3).await;
    let fallback = fixture.mock_reply(FALLBACK_PATH, 502, "bad gateway", 3).await;

    let client = fixture
        .builder()
        .retry_policy(RetryPolicy::new(3, Duration::from_millis(5)))
        .build()
        .unwrap();
    let err = client.get_interpretation("test prompt").await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_timed_out_primary_falls_back() {
    let fixture = MockServerFixture::new().await;
    let stalled = spawn_slow_endpoint(None).await;
    let fallback = fixture.mock_success(FALLBACK_PATH, "備援回覆", 1).await;

    let client = fixture
        .builder()
        .primary_url(stalled)
        .transport_config(short_timeouts())
        .retry_policy(RetryPolicy::new(2, Duration::from_millis(10)))
        .build()
        .unwrap();
    let text = client.get_interpretation("test prompt").await.unwrap();

    assert_eq!(text, "備援回覆");
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_timeout_is_transient_call_failure() {
    let stalled = spawn_slow_endpoint(None).await;

    let client = InterpretationClientBuilder::new()
        .api_key(API_KEY)
        .primary_url(stalled.clone())
        .fallback_url(stalled)
        .transport_config(short_timeouts())
        .retry_policy(RetryPolicy::new(2, Duration::from_millis(10)))
        .build()
        .unwrap();
    let err = client.get_interpretation("test prompt").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransientCallFailure);
    match &err {
        Error::Transport(TransportError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("expected a timed out transport error, got {:?}", other),
    }
    assert!(err.to_string().contains("timed out"));
}
