//! Anthropic Messages API client.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::types::{AnthropicResponseRaw, Completion, CompletionRequest, Usage};

/// Bound on a single completion call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Anthropic (Claude) API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl AnthropicClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base URL (for proxies, gateways, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout (default: 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a single completion request.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(timeout_ms = self.timeout.as_millis(), "Anthropic request timed out");
                    LlmError::Network(format!("request timed out after {:?}", self.timeout))
                } else {
                    warn!(error = %e, "Anthropic request failed");
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Anthropic API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let raw: AnthropicResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = raw.text().ok_or(LlmError::EmptyResponse)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            response_chars = content.len(),
            "Anthropic completion"
        );

        Ok(Completion {
            content,
            usage: raw.usage.map(|u| Usage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let client = AnthropicClient::new("sk-ant-secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_with_base_url() {
        let client = AnthropicClient::new("k").with_base_url("http://localhost:9000/v1");
        assert_eq!(client.base_url(), "http://localhost:9000/v1");
    }

    /// Serve one canned HTTP response on a local port, or hold the
    /// connection open without answering when `response` is `None`.
    async fn serve_once(response: Option<String>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{}", addr)
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("claude-test").message(crate::types::Message::user("hi"))
    }

    #[tokio::test]
    async fn test_complete_reads_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"{\"status\":\"Misleading\"}"}],"usage":{"input_tokens":7,"output_tokens":3}}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let client = AnthropicClient::new("k").with_base_url(serve_once(Some(response)).await);

        let completion = client.complete(&request()).await.unwrap();
        assert_eq!(completion.content, r#"{"status":"Misleading"}"#);
        assert_eq!(completion.usage.map(|u| u.output_tokens), Some(3));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let response = "HTTP/1.1 529 Overloaded\r\ncontent-length: 10\r\nconnection: close\r\n\r\noverloaded";
        let client = AnthropicClient::new("k").with_base_url(serve_once(Some(response.to_string())).await);

        match client.complete(&request()).await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 529);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_call_times_out() {
        let client = AnthropicClient::new("k")
            .with_base_url(serve_once(None).await)
            .with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let result = client.complete(&request()).await;

        assert!(matches!(result, Err(LlmError::Network(ref m)) if m.contains("timed out")));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
