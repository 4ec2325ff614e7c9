//! HTTP client for making requests to the search and chat providers

use crate::config::ProviderSettings;
use crate::error::ProviderError;
use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON POST request to a provider
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// URL to request
    pub url: String,
    /// Bearer token for the Authorization header
    pub bearer: Option<String>,
    /// JSON body
    pub body: serde_json::Value,
}

impl ApiRequest {
    /// Create a JSON POST request
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            bearer: None,
            body,
        }
    }

    /// Authenticate with a bearer token
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// HTTP response from a provider
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ApiResponse {
    /// Parse response as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, ProviderError> {
        serde_json::from_str(&self.text).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper configured from provider settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&ProviderSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &ProviderSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(settings.timeout())
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: settings.timeout(),
        })
    }

    /// Execute a request; non-2xx statuses are returned as errors
    pub async fn execute(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<ApiResponse, ProviderError> {
        let mut req_builder = self
            .client
            .post(&request.url)
            .timeout(self.default_timeout)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(ref token) = request.bearer {
            req_builder = req_builder.bearer_auth(token);
        }

        let response = req_builder.json(&request.body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.default_timeout)
            } else {
                ProviderError::Network(e)
            }
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let response = ApiResponse { status, text };

        if !response.is_success() {
            return Err(ProviderError::Status {
                status,
                body: truncate(&response.text, 200),
            });
        }

        Ok(response)
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<T, ProviderError> {
        self.execute(request).await?.json()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_post_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request =
            ApiRequest::post(format!("{}/echo", server.uri()), json!({})).bearer("secret");
        let value: serde_json::Value = client.post_json(request).await.unwrap();

        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .execute(ApiRequest::post(server.uri(), json!({})))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Status { status: 503, ref body } if body == "overloaded"
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
