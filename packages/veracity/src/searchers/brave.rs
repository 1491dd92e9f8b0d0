//! Brave Search API searcher.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{SearchError, SearchResult};
use crate::security::SecretString;
use crate::traits::searcher::WebSearcher;
use crate::types::{evidence::EvidenceItem, language::Language};

const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Brave caps `count` at 20.
const MAX_COUNT: usize = 20;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Brave search response.
#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

/// A single Brave web result.
#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    age: Option<String>,
}

/// Brave-backed web searcher.
///
/// Restricts results to the past month (`freshness=pm`) so the model sees
/// current reporting rather than stale pages.
pub struct BraveSearcher {
    api_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    cooldown: Duration,
}

impl BraveSearcher {
    /// Create a new Brave searcher with a 10 second request timeout.
    pub fn new(api_key: impl Into<String>) -> SearchResult<Self> {
        Self::with_timeout(api_key, Duration::from_secs(10))
    }

    /// Create a searcher with a custom request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> SearchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Http(Box::new(e)))?;

        Ok(Self {
            api_key: SecretString::new(api_key),
            client,
            base_url: BRAVE_SEARCH_URL.to_string(),
            cooldown: Duration::from_secs(1),
        })
    }

    /// Set a custom endpoint (for proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the pause taken after a 429 before reporting it.
    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

#[async_trait]
impl WebSearcher for BraveSearcher {
    fn is_enabled(&self) -> bool {
        !self.api_key.is_blank()
    }

    async fn search(
        &self,
        query: &str,
        count: usize,
        language: Language,
    ) -> SearchResult<Vec<EvidenceItem>> {
        if !self.is_enabled() {
            tracing::warn!("Search attempted but Brave API key not configured");
            return Err(SearchError::Disabled);
        }

        let count = count.min(MAX_COUNT);
        let country = match language {
            Language::De => "de",
            Language::En => "us",
        };
        let count_param = count.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", self.api_key.expose())
            .query(&[
                ("q", query),
                ("count", count_param.as_str()),
                ("search_lang", language.code()),
                ("country", country),
                ("safesearch", "moderate"),
                ("freshness", "pm"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        query: query.to_string(),
                    }
                } else {
                    SearchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Brave Search API rate limit hit (429), cooling down");
            tokio::time::sleep(self.cooldown).await;
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Brave Search API error");
            return Err(SearchError::Http(Box::new(std::io::Error::other(format!(
                "Brave API error {}: {}",
                status, body
            )))));
        }

        let brave_response: BraveResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let results: Vec<EvidenceItem> = brave_response
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(count)
            .map(to_evidence)
            .collect();

        tracing::info!(query = %query, results = results.len(), "Brave search completed");
        Ok(results)
    }
}

fn to_evidence(result: BraveResult) -> EvidenceItem {
    EvidenceItem::new(
        strip_html(&result.title),
        result.url,
        strip_html(&result.description),
    )
    .with_age(result.age.unwrap_or_default())
}

/// Remove markup Brave uses for highlighting and decode the common entities.
fn strip_html(text: &str) -> String {
    HTML_TAG
        .replace_all(text, "")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("The <strong>Berlin Wall</strong> fell in 1989"),
            "The Berlin Wall fell in 1989"
        );
        assert_eq!(strip_html("Tom &amp; Jerry&#x27;s"), "Tom & Jerry's");
    }

    #[test]
    fn test_parse_brave_response() {
        let body = r#"{
            "type": "search",
            "web": {"results": [
                {"title": "<b>Fall</b> of the Wall", "url": "https://example.org/wall",
                 "description": "On <strong>9 November 1989</strong> the border opened.", "age": "2 days ago"},
                {"title": "No age", "url": "https://example.org/b", "description": "text"}
            ]}
        }"#;

        let response: BraveResponse = serde_json::from_str(body).unwrap();
        let items: Vec<EvidenceItem> = response
            .web
            .unwrap()
            .results
            .into_iter()
            .map(to_evidence)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Fall of the Wall");
        assert_eq!(items[0].snippet, "On 9 November 1989 the border opened.");
        assert_eq!(items[0].age.as_deref(), Some("2 days ago"));
        assert!(items[1].age.is_none());
    }

    #[test]
    fn test_missing_web_section() {
        let response: BraveResponse = serde_json::from_str(r#"{"type":"search"}"#).unwrap();
        assert!(response.web.is_none());
    }

    #[tokio::test]
    async fn test_blank_key_is_disabled() {
        let searcher = BraveSearcher::new("").unwrap();
        assert!(!searcher.is_enabled());
        assert!(matches!(
            searcher.search("q", 3, Language::En).await,
            Err(SearchError::Disabled)
        ));
    }

    /// Answer the first request on a local port with `response`, or keep the
    /// connection open without answering when it is `None`.
    async fn serve_once(response: Option<String>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8 * 1024];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{}/res/v1/web/search", addr)
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    async fn searcher_for(response: Option<String>) -> BraveSearcher {
        BraveSearcher::with_timeout("brave-key", Duration::from_millis(300))
            .unwrap()
            .with_base_url(serve_once(response).await)
            .with_rate_limit_cooldown(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_search_maps_results() {
        let body = r#"{"web":{"results":[
            {"title":"<strong>Wall</strong> falls","url":"https://example.org/wall","description":"Crossings opened &amp; crowds gathered."}
        ]}}"#;
        let searcher = searcher_for(Some(http_response("200 OK", body))).await;

        let items = searcher.search("berlin wall", 3, Language::De).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Wall falls");
        assert_eq!(items[0].url, "https://example.org/wall");
        assert_eq!(items[0].snippet, "Crossings opened & crowds gathered.");
    }

    #[tokio::test]
    async fn test_429_is_rate_limited() {
        let searcher = searcher_for(Some(http_response("429 Too Many Requests", "{}"))).await;

        assert!(matches!(
            searcher.search("q", 3, Language::En).await,
            Err(SearchError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let searcher = searcher_for(Some(http_response("500 Internal Server Error", "boom"))).await;

        match searcher.search("q", 3, Language::En).await {
            Err(SearchError::Http(e)) => assert!(e.to_string().contains("500")),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_invalid_response() {
        let searcher = searcher_for(Some(http_response("200 OK", "not json"))).await;

        assert!(matches!(
            searcher.search("q", 3, Language::En).await,
            Err(SearchError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unanswered_request_times_out() {
        let searcher = searcher_for(None).await;

        match searcher.search("slow query", 3, Language::En).await {
            Err(SearchError::Timeout { query }) => assert_eq!(query, "slow query"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
