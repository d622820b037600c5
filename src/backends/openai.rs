//! OpenAI-compatible chat completions client.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` endpoint (vLLM, Ollama, Azure-style proxies).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Usage},
    error::GradingError,
};

use super::config::ModelConfig;

/// Client for an OpenAI-compatible chat completions API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    config: Arc<ModelConfig>,
    base_url: Url,
    client: Client,
}

#[derive(Serialize, Debug)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Request payload for the chat completions endpoint.
#[derive(Serialize, Debug)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    content: Option<String>,
}

impl std::fmt::Display for OpenAIChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "No response content"),
        }
    }
}

impl ChatResponse for OpenAIChatResponse {
    fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|content| !content.is_empty())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl OpenAI {
    /// Creates a client with its own HTTP connection pool.
    pub fn new(config: ModelConfig) -> Result<Self, GradingError> {
        let mut builder = Client::builder();
        if let Some(sec) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Self::with_client(builder.build()?, config)
    }

    /// Creates a client reusing an existing HTTP client.
    pub fn with_client(client: Client, config: ModelConfig) -> Result<Self, GradingError> {
        if config.credential.expose_secret().is_empty() {
            return Err(GradingError::AuthError("Missing OpenAI API key".to_string()));
        }
        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self {
            config: Arc::new(config),
            base_url,
            client,
        })
    }

    fn completions_url(&self) -> Result<Url, GradingError> {
        self.base_url
            .join("chat/completions")
            .map_err(|e| GradingError::HttpError(e.to_string()))
    }

    fn log_request_payload<T: Serialize>(&self, label: &str, body: &T) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        if let Ok(json) = serde_json::to_string(body) {
            log::trace!("{label}: {json}");
        }
    }

    async fn ensure_success_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, GradingError> {
        let status = response.status();
        log::debug!("{context} HTTP status: {status}");
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await?;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GradingError::AuthError(
                format!("{context} rejected credentials ({status}): {error_text}"),
            )),
            _ => Err(GradingError::ProviderError(format!(
                "{context} returned error status {status}: {error_text}"
            ))),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, GradingError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| GradingError::ConfigurationError(format!("Invalid base URL '{raw}': {e}")))
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, GradingError> {
        let body = OpenAIChatRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| OpenAIChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: self.config.json_mode.then_some(OpenAIResponseFormat {
                format_type: "json_object",
            }),
            stream: false,
        };
        self.log_request_payload("OpenAI chat request payload", &body);

        let mut request = self
            .client
            .post(self.completions_url()?)
            .bearer_auth(self.config.credential.expose_secret())
            .json(&body);
        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let response = request.send().await?;
        let response = self
            .ensure_success_response(response, "OpenAI chat completions")
            .await?;
        let resp_text = response.text().await?;
        let parsed: OpenAIChatResponse = serde_json::from_str(&resp_text).map_err(|e| {
            GradingError::ProviderError(format!(
                "Failed to decode chat completions response: {e}. Raw response: {resp_text}"
            ))
        })?;
        if let Some(usage) = &parsed.usage {
            log::debug!(
                "OpenAI usage: {} prompt / {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(Box::new(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        let err = OpenAI::new(ModelConfig::new("")).unwrap_err();
        assert!(matches!(err, GradingError::AuthError(_)));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let mut config = ModelConfig::new("sk-test");
        config.base_url = "http://localhost:8080/v1".to_string();
        let client = OpenAI::new(config).unwrap();
        assert_eq!(
            client.completions_url().unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_configuration_error() {
        let mut config = ModelConfig::new("sk-test");
        config.base_url = "not a url".to_string();
        assert!(matches!(
            OpenAI::new(config).unwrap_err(),
            GradingError::ConfigurationError(_)
        ));
    }

    #[test]
    fn response_text_skips_empty_content() {
        let response: OpenAIChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert!(response.text().is_none());
        assert!(response.usage().is_none());
    }
}
