//! Gutendex API Client
//!
//! Searches the Project Gutenberg catalog through the Gutendex JSON API.
//!
//! ## API Endpoints
//!
//! - **Search**: `https://gutendex.com/books/?search={words joined by '+'}`
//!
//! Only the first results page is read. Requests are sent once; failures are
//! reported to the caller without retrying.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::{BookSearchProvider, GutendexClient};
//!
//! let client = GutendexClient::from_config(http_client, &config.search);
//! let candidates = client.search("pride and prejudice").await?;
//! ```

use crate::error::{MetadataError, Result};
use crate::models::{CandidateBook, SearchPage};
use crate::providers::BookSearchProvider;
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::SearchApiConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Gutendex API client
pub struct GutendexClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl GutendexClient {
    /// Creates a new Gutendex client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Books endpoint, e.g. `https://gutendex.com/books/`
    /// * `user_agent` - Value of the `User-Agent` header
    /// * `timeout` - Per-request timeout
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &SearchApiConfig) -> Self {
        Self::new(
            http_client,
            config.base_url.clone(),
            config.user_agent.clone(),
            config.request_timeout(),
        )
    }

    /// Search URL for `query`: each whitespace-separated word is
    /// percent-encoded and the words are joined with `+`.
    pub fn build_search_url(&self, query: &str) -> String {
        let terms = query
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+");

        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}search={}", self.base_url, separator, terms)
    }

    fn decode(body: &[u8]) -> Result<SearchPage> {
        serde_json::from_slice(body).map_err(|e| {
            MetadataError::JsonParse(format!("Failed to parse search results: {}", e))
        })
    }
}

#[async_trait]
impl BookSearchProvider for GutendexClient {
    #[instrument(skip(self), fields(provider = "gutendex"))]
    async fn search(&self, query: &str) -> Result<Vec<CandidateBook>> {
        let url = self.build_search_url(query);
        debug!(%url, "Searching Gutendex");

        let request = HttpRequest::get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "Gutendex request failed");
            MetadataError::NetworkError(format!("Gutendex search failed: {}", e))
        })?;

        if !response.is_success() {
            warn!(status = response.status, "Gutendex returned an error status");
            return Err(MetadataError::HttpError {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let page = Self::decode(&response.body)?;
        info!(
            total = page.count,
            returned = page.results.len(),
            "Gutendex search completed"
        );

        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        pub Http {}

        #[async_trait::async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
        }
    }

    fn client(http: MockHttp) -> GutendexClient {
        GutendexClient::new(
            Arc::new(http),
            "https://gutendex.com/books/",
            "literalura-test/0.1",
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_build_search_url_joins_words_with_plus() {
        let client = client(MockHttp::new());
        assert_eq!(
            client.build_search_url("pride and prejudice"),
            "https://gutendex.com/books/?search=pride+and+prejudice"
        );
        assert_eq!(
            client.build_search_url("  Don   Quijote "),
            "https://gutendex.com/books/?search=Don+Quijote"
        );
    }

    #[test]
    fn test_build_search_url_encodes_each_word() {
        let client = client(MockHttp::new());
        assert_eq!(
            client.build_search_url("Les Misérables & co"),
            "https://gutendex.com/books/?search=Les+Mis%C3%A9rables+%26+co"
        );
    }

    #[test]
    fn test_build_search_url_appends_to_existing_query() {
        let client = GutendexClient::new(
            Arc::new(MockHttp::new()),
            "http://localhost:8000/books/?languages=en",
            "ua",
            Duration::from_secs(1),
        );
        assert_eq!(
            client.build_search_url("emma"),
            "http://localhost:8000/books/?languages=en&search=emma"
        );
    }

    #[tokio::test]
    async fn test_search_sends_identified_request() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|request| {
                request.url == "https://gutendex.com/books/?search=dracula"
                    && request.headers.get("User-Agent").map(String::as_str)
                        == Some("literalura-test/0.1")
                    && request.timeout == Some(Duration::from_secs(5))
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"count": 1, "next": null, "previous": null, "results": [
                        {"id": 345, "title": "Dracula",
                         "authors": [{"name": "Stoker, Bram", "birth_year": 1847, "death_year": 1912}],
                         "languages": ["en"], "download_count": 9000}
                    ]}"#,
                ))
            });

        let results = client(http).search("dracula").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Dracula");
        assert_eq!(results[0].primary_author().unwrap().name, "Stoker, Bram");
    }

    #[tokio::test]
    async fn test_empty_results() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .returning(|_| Ok(response(200, r#"{"count": 0, "next": null, "results": []}"#)));

        let results = client(http).search("zzzzqqq").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::ConnectionFailed("refused".to_string())));

        let err = client(http).search("dracula").await.unwrap_err();
        assert!(matches!(err, MetadataError::NetworkError(_)));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .returning(|_| Ok(response(503, "Service Unavailable")));

        let err = client(http).search("dracula").await.unwrap_err();
        match err {
            MetadataError::HttpError { status, ref body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_parse_error() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .returning(|_| Ok(response(200, "<html>maintenance</html>")));

        let err = client(http).search("dracula").await.unwrap_err();
        assert!(matches!(err, MetadataError::JsonParse(_)));
        assert!(!err.is_unavailable());
    }

    #[tokio::test]
    async fn test_incomplete_records_are_kept_for_the_caller() {
        let mut http = MockHttp::new();
        http.expect_execute().returning(|_| {
            Ok(response(
                200,
                r#"{"count": 2, "results": [
                    {"title": null, "authors": [], "languages": []},
                    {"title": "Emma", "authors": [{"name": "Austen, Jane"}], "languages": ["en"]}
                ]}"#,
            ))
        });

        let results = client(http).search("emma").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].validate().is_err());
        assert!(results[1].validate().is_ok());
    }
}
