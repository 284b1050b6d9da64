//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Reqwest-based HTTP client implementation
///
/// Pools connections per host. Every request is sent exactly once; error
/// statuses are returned to the caller as ordinary responses.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client identifying itself with `user_agent`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let mut req = self.client.get(&request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    fn classify_error(error: &reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout(error.to_string())
        } else if error.is_connect() {
            BridgeError::ConnectionFailed(error.to_string())
        } else {
            BridgeError::OperationFailed(error.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "Executing HTTP request");

        let response = self.build_request(request).send().await.map_err(|e| {
            warn!(error = %e, "HTTP request failed");
            Self::classify_error(&e)
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify_error(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
