//! Mock text generator for testing.
//!
//! Provides a scriptable [`TextGenerator`] so interpretation paths can be
//! tested without a running model server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{LlmError, LlmResult};
use crate::llm::{GenerationRequest, TextGenerator};

/// Scripted behavior for one model.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail with a transport error
    Fail(String),
    /// Report the model as unknown
    NotFound,
}

#[derive(Debug, Clone)]
struct ModelScript {
    reply: MockReply,
    delay: Duration,
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub method: String,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub system_prompt: Option<String>,
}

/// Mock generator for testing.
///
/// Replies are scripted per model; unscripted models get the default reply.
/// Delays are real (`tokio::time::sleep`) so timeouts can be exercised.
#[derive(Clone)]
pub struct MockGenerator {
    scripts: Arc<RwLock<HashMap<String, ModelScript>>>,
    default_reply: Arc<RwLock<MockReply>>,
    models: Arc<RwLock<Vec<String>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Create a mock that fails every call until scripted.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(RwLock::new(HashMap::new())),
            default_reply: Arc::new(RwLock::new(MockReply::Fail(
                "no scripted reply".to_string(),
            ))),
            models: Arc::new(RwLock::new(Vec::new())),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn script(self, model: &str, reply: MockReply, delay: Duration) -> Self {
        self.scripts
            .write()
            .insert(model.to_string(), ModelScript { reply, delay });
        self.models.write().push(model.to_string());
        self
    }

    /// `model` answers with `text`.
    pub fn with_reply(self, model: &str, text: impl Into<String>) -> Self {
        self.script(model, MockReply::Text(text.into()), Duration::ZERO)
    }

    /// `model` answers with `text` after `delay`.
    pub fn with_delayed_reply(self, model: &str, text: impl Into<String>, delay: Duration) -> Self {
        self.script(model, MockReply::Text(text.into()), delay)
    }

    /// `model` fails with a transport error.
    pub fn with_failure(self, model: &str, message: impl Into<String>) -> Self {
        self.script(model, MockReply::Fail(message.into()), Duration::ZERO)
    }

    /// `model` is reported as not found (and is not listed).
    pub fn with_missing_model(self, model: &str) -> Self {
        self.scripts.write().insert(
            model.to_string(),
            ModelScript {
                reply: MockReply::NotFound,
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Reply for unscripted models.
    pub fn with_default_reply(self, text: impl Into<String>) -> Self {
        *self.default_reply.write() = MockReply::Text(text.into());
        self
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Check if a specific method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.method == method)
    }

    fn record_call(&self, call: CapturedCall) {
        self.captured_calls.write().push(call);
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String> {
        self.record_call(CapturedCall {
            method: "generate".to_string(),
            model: Some(request.model.clone()),
            prompt: Some(request.prompt.clone()),
            system_prompt: request.system_prompt.clone(),
        });

        let script = self.scripts.read().get(&request.model).cloned();
        let (reply, delay) = match script {
            Some(script) => (script.reply, script.delay),
            None => (self.default_reply.read().clone(), Duration::ZERO),
        };

        if !delay.is_zero() {
            if delay > request.timeout {
                tokio::time::sleep(request.timeout).await;
                return Err(LlmError::Timeout {
                    model: request.model.clone(),
                    seconds: request.timeout.as_secs(),
                });
            }
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(LlmError::Transport(message)),
            MockReply::NotFound => Err(LlmError::ModelNotFound(request.model.clone())),
        }
    }

    async fn list_models(&self) -> LlmResult<Vec<String>> {
        self.record_call(CapturedCall {
            method: "list_models".to_string(),
            model: None,
            prompt: None,
            system_prompt: None,
        });
        Ok(self.models.read().clone())
    }
}
