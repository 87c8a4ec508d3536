//! Text-generation backends.
//!
//! [`TextGenerator`] is the seam the interpreter talks to. [`HttpGenerator`]
//! speaks either the Ollama or the OpenAI-compatible wire dialect; tests use
//! [`crate::mock::MockGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{InterpreterConfig, Provider};
use crate::error::{LlmError, LlmResult};

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub timeout: Duration,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_prompt: None,
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Generate a completion. Implementations must honor `request.timeout`.
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String>;

    /// Models the backend can serve.
    async fn list_models(&self) -> LlmResult<Vec<String>>;
}

/// Wire dialect of an HTTP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `POST /api/generate`, `GET /api/tags`
    Ollama,
    /// `POST /v1/chat/completions`, `GET /v1/models`
    OpenAi,
}

/// HTTP text-generation backend.
pub struct HttpGenerator {
    dialect: Dialect,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpGenerator {
    pub fn new(dialect: Dialect, base_url: impl Into<String>) -> Self {
        Self {
            dialect,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the default HTTP client (proxies, TLS roots, pooling).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Backend described by `config`; `None` for pattern-only configurations.
    pub fn from_config(config: &InterpreterConfig) -> Option<Self> {
        let dialect = match config.provider {
            Provider::None => return None,
            Provider::Ollama => Dialect::Ollama,
            Provider::OpenAi => Dialect::OpenAi,
        };
        let generator = Self::new(dialect, config.base_url()?);
        Some(match &config.api_key {
            Some(key) if !key.is_empty() => generator.with_api_key(key.clone()),
            _ => generator,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn check_status(response: reqwest::Response, model: &str) -> LlmResult<reqwest::Response> {
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(LlmError::ModelNotFound(model.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn generate_ollama(&self, request: &GenerationRequest) -> LlmResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaRequest::from(request);

        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;
        let response = Self::check_status(response, &request.model).await?;
        let result: OllamaResponse = response.json().await?;
        Ok(result.response)
    }

    async fn generate_openai(&self, request: &GenerationRequest) -> LlmResult<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest::from(request);

        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;
        let response = Self::check_status(response, &request.model).await?;
        let result: ChatResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::EmptyResponse(request.model.clone()))
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    fn name(&self) -> &str {
        match self.dialect {
            Dialect::Ollama => "ollama",
            Dialect::OpenAi => "openai",
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        debug!("Generating with {} via {}", request.model, self.name());
        let call = async {
            match self.dialect {
                Dialect::Ollama => self.generate_ollama(request).await,
                Dialect::OpenAi => self.generate_openai(request).await,
            }
        };

        let text = tokio::time::timeout(request.timeout, call)
            .await
            .map_err(|_| LlmError::Timeout {
                model: request.model.clone(),
                seconds: request.timeout.as_secs(),
            })??;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(request.model.clone()));
        }
        Ok(text)
    }

    async fn list_models(&self) -> LlmResult<Vec<String>> {
        let call = async {
            match self.dialect {
                Dialect::Ollama => {
                    let url = format!("{}/api/tags", self.base_url);
                    let response = self.authorized(self.client.get(&url)).send().await?;
                    let response = Self::check_status(response, "").await?;
                    let tags: OllamaTags = response.json().await?;
                    Ok::<_, LlmError>(tags.models.into_iter().map(|m| m.name).collect())
                }
                Dialect::OpenAi => {
                    let url = format!("{}/v1/models", self.base_url);
                    let response = self.authorized(self.client.get(&url)).send().await?;
                    let response = Self::check_status(response, "").await?;
                    let list: ModelList = response.json().await?;
                    Ok(list.data.into_iter().map(|m| m.id).collect())
                }
            }
        };

        let timeout = Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS);
        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| LlmError::Timeout {
                model: "model list".to_string(),
                seconds: timeout.as_secs(),
            })?
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
}

impl From<&GenerationRequest> for OllamaRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system_prompt.clone(),
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

impl From<&GenerationRequest> for ChatRequest {
    fn from(request: &GenerationRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });
        Self {
            model: request.model.clone(),
            messages,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        assert!(HttpGenerator::from_config(&InterpreterConfig::default()).is_none());

        let config = InterpreterConfig {
            provider: Provider::OpenAi,
            base_url: Some("http://localhost:8080/".to_string()),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let generator = HttpGenerator::from_config(&config).unwrap();
        assert_eq!(generator.dialect(), Dialect::OpenAi);
        assert_eq!(generator.base_url(), "http://localhost:8080");
        assert_eq!(generator.name(), "openai");
    }

    #[test]
    fn test_ollama_body() {
        let request = GenerationRequest::new("llama3", "make it red").system("be terse");
        let body = serde_json::to_value(OllamaRequest::from(&request)).unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_chat_body() {
        let request = GenerationRequest::new("gpt-4o-mini", "make it red");
        let body = serde_json::to_value(ChatRequest::from(&request)).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");

        let request = request.system("be terse");
        let body = serde_json::to_value(ChatRequest::from(&request)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
    }
}
