//! Perplexity search engine implementation

use super::traits::*;
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use crate::llm::{completion_body, ChatMessage, CompletionResponse};
use crate::network::{ApiRequest, HttpClient};
use async_trait::async_trait;
use tracing::debug;

const SYSTEM_PROMPT: &str = "Use the search tool to answer the query accurately.\n\
- Cite search results with bracketed numbers like [1], with no space between the last word and the citation. \
Use this format only for citations and never add a references section.\n\
- If the results are empty or unhelpful, answer from existing knowledge and say so.\n\
- Format the answer in markdown. Use level 2 and 3 headings to separate parts, \
but never start the answer with a heading and never use level 1 headings.\n\
- Never write URLs or links.";

/// Perplexity chat-completions search with citations
pub struct Perplexity {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl Perplexity {
    /// Create the engine from provider settings; an API key is required
    pub fn new(
        client: HttpClient,
        settings: &ProviderSettings,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::MissingApiKey("search provider".to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.completions_url(),
            api_key,
            model: model.into(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl SearchEngine for Perplexity {
    fn name(&self) -> &str {
        "perplexity"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn search(&self, query: &str) -> Result<SearchAnswer, ProviderError> {
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];
        let request = ApiRequest::post(
            self.endpoint.clone(),
            completion_body(&self.model, &messages, self.temperature),
        )
        .bearer(self.api_key.clone());

        let response: CompletionResponse = self.client.post_json(request).await?;
        let content = response.first_content()?.to_string();

        debug!(
            "Perplexity answered '{}' with {} citations",
            query,
            response.citations.len()
        );

        Ok(SearchAnswer::new(content, response.citations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine(server: &MockServer) -> Perplexity {
        let settings = ProviderSettings {
            base_url: server.uri(),
            api_key: Some("pplx-key".to_string()),
            request_timeout: 5.0,
            ..Default::default()
        };
        Perplexity::new(HttpClient::with_settings(&settings).unwrap(), &settings, "sonar").unwrap()
    }

    #[tokio::test]
    async fn test_search_with_citations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "sonar"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Rust is fast[1][2]."}}],
                "citations": ["https://a.example", "https://b.example"]
            })))
            .mount(&server)
            .await;

        let answer = engine(&server).search("is rust fast").await.unwrap();

        assert_eq!(answer.content, "Rust is fast[1][2].");
        assert_eq!(answer.citations, vec!["https://a.example", "https://b.example"]);
    }

    #[tokio::test]
    async fn test_search_without_citations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "No sources."}}]
            })))
            .mount(&server)
            .await;

        let answer = engine(&server).search("obscure").await.unwrap();
        assert!(answer.citations.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = engine(&server).search("q").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 429, .. }));
    }
}
