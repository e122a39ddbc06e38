//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use tarot_reader::{InterpretationClient, InterpretationClientBuilder, RetryPolicy};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const API_KEY: &str = "test-key";
pub const PRIMARY_PATH: &str = "/v1beta/models/primary:generateContent";
pub const FALLBACK_PATH: &str = "/v1beta/models/fallback:generateContent";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builder pointed at the mock server through the `{model}` template.
    pub fn builder(&self) -> InterpretationClientBuilder {
        InterpretationClientBuilder::new()
            .api_key(API_KEY)
            .url_template(format!("{}/v1beta/models/{{model}}:generateContent", self.base_url))
            .primary_model("primary")
            .fallback_model("fallback")
    }

    /// Client with the default retry policy (2 attempts, 350ms backoff).
    pub fn client(&self) -> InterpretationClient {
        self.builder().build().expect("Failed to build client")
    }

    /// Client with a short backoff for tests that do not measure timing.
    pub fn fast_client(&self) -> InterpretationClient {
        self.builder()
            .retry_policy(RetryPolicy::new(2, Duration::from_millis(20)))
            .build()
            .expect("Failed to build client")
    }

    /// Create a mock answering `hits` POSTs on `path` with `status` and `body`.
    pub async fn mock_reply(&self, path: &str, status: usize, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Create a mock for a successful generateContent response carrying `text`.
    pub async fn mock_success(&self, path: &str, text: &str, hits: usize) -> Mock {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        });
        self.mock_reply(path, 200, &body.to_string(), hits).await
    }
}

/// Raw TCP endpoint that reads the request and then either never answers (`None`) or answers
/// `500` after `reply_after`. Returns a URL usable as an explicit endpoint override.
pub async fn spawn_slow_endpoint(reply_after: Option<Duration>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                match reply_after {
                    Some(delay) => {
                        tokio::time::sleep(delay).await;
                        let _ = socket
                            .write_all(
                                b"HTTP/1.1 500 Internal Server Error\r\n\
                                  content-length: 4\r\nconnection: close\r\n\r\nslow",
                            )
                            .await;
                    }
                    None => tokio::time::sleep(Duration::from_secs(3600)).await,
                }
            });
        }
    });

    format!("http://{}/v1beta/models/slow:generateContent", addr)
}
