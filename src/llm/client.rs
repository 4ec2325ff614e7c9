//! Chat completion client

use super::conversation::ChatMessage;
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use crate::network::{ApiRequest, HttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// A chat model that answers a message history with text
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete `messages` with `model`, returning the assistant's text
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}

/// OpenAI-style chat completion response.
///
/// Search providers that answer with citations add a top-level `citations`
/// array next to `choices`.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice
    pub fn first_content(&self) -> Result<&str, ProviderError> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("response has no message content".to_string())
            })
    }
}

/// Build the JSON body of a chat completion request
pub fn completion_body(
    model: &str,
    messages: &[ChatMessage],
    temperature: f32,
) -> serde_json::Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
    })
}

/// OpenRouter chat completion client
pub struct OpenRouter {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

impl OpenRouter {
    /// Create a client from provider settings; an API key is required
    pub fn new(client: HttpClient, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::MissingApiKey("chat provider".to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.completions_url(),
            api_key,
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for OpenRouter {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        debug!("Chat completion with {} ({} messages)", model, messages.len());

        let request = ApiRequest::post(
            self.endpoint.clone(),
            completion_body(model, messages, self.temperature),
        )
        .bearer(self.api_key.clone());

        let response: CompletionResponse = self.client.post_json(request).await?;
        Ok(response.first_content()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer, api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            request_timeout: 5.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer or-key"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi there"}}]
            })))
            .mount(&server)
            .await;

        let settings = settings(&server, Some("or-key"));
        let client = HttpClient::with_settings(&settings).unwrap();
        let model = OpenRouter::new(client, &settings).unwrap();
        let reply = model
            .complete("test/model", &[ChatMessage::user("hello")])
            .await
            .unwrap();

        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let settings = settings(&server, Some("k"));
        let client = HttpClient::with_settings(&settings).unwrap();
        let model = OpenRouter::new(client, &settings).unwrap();
        let err = model.complete("m", &[]).await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_requires_api_key() {
        let server = MockServer::start().await;
        let settings = settings(&server, None);
        let result = OpenRouter::new(HttpClient::new().unwrap(), &settings);
        assert!(matches!(result, Err(ProviderError::MissingApiKey(_))));
    }
}
