//! Text-generation capability.
//!
//! ## API Endpoints
//!
//! | Endpoint | URL | Purpose |
//! |----------|-----|--------|
//! | Chat | `{MODEL_API_URL}/chat/completions` | OpenAI-compatible chat |
//!
//! ## Authentication
//! - Header: `Authorization: Bearer {MODEL_API_KEY}` (omitted when unset)

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ModelError;

/// Model size class requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    TextSmall,
    TextLarge,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::TextSmall => write!(f, "TEXT_SMALL"),
            ModelType::TextLarge => write!(f, "TEXT_LARGE"),
        }
    }
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn use_model(&self, model_type: ModelType, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiModel {
    client: Client,
    api_url: String,
    api_key: Option<SecretString>,
    small_model: String,
    large_model: String,
}

impl OpenAiModel {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<SecretString>,
        small_model: impl Into<String>,
        large_model: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
            small_model: small_model.into(),
            large_model: large_model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ModelError> {
        Self::new(
            config.model_api_url.clone(),
            config.model_api_key.clone(),
            config.small_model.clone(),
            config.large_model.clone(),
        )
    }

    fn model_name(&self, model_type: ModelType) -> &str {
        match model_type {
            ModelType::TextSmall => &self.small_model,
            ModelType::TextLarge => &self.large_model,
        }
    }
}

#[async_trait]
impl TextModel for OpenAiModel {
    async fn use_model(&self, model_type: ModelType, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.api_url);
        let model = self.model_name(model_type);
        debug!("Model request: type={}, model={}", model_type, model);

        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        let response = builder.send().await?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ModelError::Overloaded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, Matcher};

    fn model() -> OpenAiModel {
        OpenAiModel::new(
            format!("{}/v1/", mockito::server_url()),
            Some(SecretString::new("test-key".into())),
            "small-test-model",
            "large-test-model",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let _m = mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Regex("small-test-model".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"<response><chainId>1</chainId></response>"}}]}"#)
            .create();

        let text = model()
            .use_model(ModelType::TextSmall, "which chain?")
            .await
            .unwrap();
        assert_eq!(text, "<response><chainId>1</chainId></response>");
    }

    #[tokio::test]
    async fn service_unavailable_is_overloaded() {
        let _m = mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Regex("large-test-model".into()))
            .with_status(503)
            .with_body("busy")
            .create();

        let err = model()
            .use_model(ModelType::TextLarge, "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Overloaded));
    }
}
