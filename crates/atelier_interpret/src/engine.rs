//! Prompt engine facade.
//!
//! Chains the interpretation paths for one request:
//!
//! 1. several models with consensus selection, or a single model
//! 2. the pattern interpreter
//! 3. intent guessing, which may re-run the patterns on a restated prompt
//!    or hand a clarification back to the caller

use std::sync::Arc;

use atelier_model::{Changes, PropMap, StyleMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::{interpret_action_patterns, interpret_action_via_model, ActionRequest, ActionResult};
use crate::config::InterpreterConfig;
use crate::consensus::{query_multi, ConsensusResult, MultiQuery};
use crate::error::{LlmError, LlmResult};
use crate::generative::interpret_via_model;
use crate::intent::{self, Clarification};
use crate::llm::{GenerationRequest, HttpGenerator, TextGenerator};
use crate::patterns::PatternInterpreter;
use crate::prompts::{action_user_prompt, style_user_prompt, ACTION_SYSTEM_PROMPT, STYLE_SYSTEM_PROMPT};
use crate::repair::changes_from_output;

/// An edit request against one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub prompt: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub current_style: Option<StyleMap>,
    #[serde(default)]
    pub current_props: Option<PropMap>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn component_type(mut self, component_type: impl Into<String>) -> Self {
        self.component_type = Some(component_type.into());
        self
    }

    pub fn current_style(mut self, style: StyleMap) -> Self {
        self.current_style = Some(style);
        self
    }

    pub fn current_props(mut self, props: PropMap) -> Self {
        self.current_props = Some(props);
        self
    }
}

/// Which path produced a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Consensus,
    Pattern,
    None,
}

/// Result of [`PromptEngine::interpret_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOutcome {
    pub changes: Changes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification: Option<Clarification>,
}

impl PromptOutcome {
    fn patched(changes: Changes, source: Source) -> Self {
        Self {
            changes,
            raw_model_output: None,
            model_used: None,
            source,
            clarification: None,
        }
    }
}

/// Entry point for prompt and action interpretation.
pub struct PromptEngine {
    config: InterpreterConfig,
    generator: Option<Arc<dyn TextGenerator>>,
    patterns: PatternInterpreter,
}

impl PromptEngine {
    /// Engine for `config`, with an HTTP backend when the config names one.
    pub fn new(config: InterpreterConfig) -> Self {
        let generator = if config.is_generative() {
            HttpGenerator::from_config(&config).map(|g| Arc::new(g) as Arc<dyn TextGenerator>)
        } else {
            None
        };
        Self {
            config,
            generator,
            patterns: PatternInterpreter::new(),
        }
    }

    /// Use `generator` instead of the configured backend.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternInterpreter {
        &self.patterns
    }

    fn generation_request(&self, model: &str, prompt: String, system: &str) -> GenerationRequest {
        GenerationRequest::new(model, prompt)
            .system(system)
            .timeout(self.config.timeout())
    }

    async fn interpret_with_models(&self, request: &PromptRequest) -> Option<PromptOutcome> {
        let generator = self.generator.as_ref()?;
        let user_prompt = style_user_prompt(
            &request.prompt,
            request.component_type.as_deref(),
            request.current_style.as_ref(),
            request.current_props.as_ref(),
        );

        if let Some(models) = self.config.consensus_models() {
            let query = MultiQuery::new(user_prompt, models.to_vec())
                .configured(&self.config)
                .system(STYLE_SYSTEM_PROMPT);
            return match query_multi(Arc::clone(generator), &query).await {
                ConsensusResult::Selected {
                    result, model_used, ..
                } => changes_from_output(&result).map(|changes| PromptOutcome {
                    raw_model_output: Some(result),
                    model_used: Some(model_used),
                    ..PromptOutcome::patched(changes, Source::Consensus)
                }),
                ConsensusResult::AllFailed { .. } => None,
            };
        }

        let model = self.config.primary_model()?;
        let generation = self.generation_request(model, user_prompt, STYLE_SYSTEM_PROMPT);
        let patch = interpret_via_model(generator.as_ref(), &generation).await?;
        Some(PromptOutcome {
            raw_model_output: Some(patch.raw),
            model_used: Some(model.to_string()),
            ..PromptOutcome::patched(patch.changes, Source::Model)
        })
    }

    /// Interpret an edit request.
    ///
    /// Never fails: when no path yields a patch the outcome carries a
    /// clarification instead.
    pub async fn interpret_prompt(&self, request: &PromptRequest) -> PromptOutcome {
        if let Some(outcome) = self.interpret_with_models(request).await {
            info!(
                "Interpreted prompt via {:?} ({})",
                outcome.source,
                outcome.model_used.as_deref().unwrap_or("-")
            );
            return outcome;
        }

        let interpret = |prompt: &str| {
            self.patterns.interpret(
                prompt,
                request.component_type.as_deref(),
                request.current_style.as_ref(),
                request.current_props.as_ref(),
            )
        };

        let changes = interpret(&request.prompt);
        if !changes.is_empty() {
            return PromptOutcome::patched(changes, Source::Pattern);
        }

        let clarification = intent::clarify(&request.prompt, request.component_type.as_deref());
        if !clarification.needs_clarification {
            if let Some(guess) = clarification.guess.as_deref() {
                let changes = interpret(guess);
                if !changes.is_empty() {
                    debug!("Applied guessed intent '{}'", guess);
                    return PromptOutcome {
                        clarification: Some(clarification),
                        ..PromptOutcome::patched(changes, Source::Pattern)
                    };
                }
            }
            return PromptOutcome {
                clarification: Some(intent::not_understood(&request.prompt)),
                ..PromptOutcome::patched(Changes::default(), Source::None)
            };
        }

        PromptOutcome {
            clarification: Some(clarification),
            ..PromptOutcome::patched(Changes::default(), Source::None)
        }
    }

    /// Interpret what a component should do when clicked.
    pub async fn interpret_action(&self, request: &ActionRequest) -> ActionResult {
        if let (Some(generator), Some(model)) = (self.generator.as_ref(), self.config.primary_model()) {
            let user_prompt = action_user_prompt(
                &request.message,
                request.component_type.as_deref(),
                request.component_id.as_deref(),
                &request.page_routes(),
            );
            let generation = self.generation_request(model, user_prompt, ACTION_SYSTEM_PROMPT);
            if let Some(result) = interpret_action_via_model(generator.as_ref(), &generation).await {
                return result;
            }
        }
        interpret_action_patterns(request)
    }

    /// Restate a prompt that produced no patch.
    pub fn guess_intent(&self, prompt: &str, component_type: Option<&str>) -> Option<String> {
        intent::guess_intent(prompt, component_type)
    }

    /// Models the backend can serve.
    pub async fn available_models(&self) -> LlmResult<Vec<String>> {
        match &self.generator {
            Some(generator) => generator.list_models().await,
            None => Err(LlmError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pattern_only() {
        let engine = PromptEngine::new(InterpreterConfig::pattern_only());
        let outcome = engine
            .interpret_prompt(&PromptRequest::new("make background blue"))
            .await;
        assert_eq!(outcome.source, Source::Pattern);
        assert_eq!(outcome.changes, Changes::with_style([("backgroundColor", "#0000ff")]));
        assert!(outcome.raw_model_output.is_none());
    }

    #[tokio::test]
    async fn test_clarification() {
        let engine = PromptEngine::new(InterpreterConfig::pattern_only());
        let outcome = engine
            .interpret_prompt(&PromptRequest::new("the corners feel too sharp"))
            .await;
        assert_eq!(outcome.source, Source::None);
        assert!(outcome.changes.is_empty());
        let clarification = outcome.clarification.unwrap();
        assert!(clarification.needs_clarification);
        assert_eq!(clarification.guess.as_deref(), Some("make corners rounded"));
    }

    #[tokio::test]
    async fn test_not_configured() {
        let engine = PromptEngine::new(InterpreterConfig::pattern_only());
        assert!(matches!(
            engine.available_models().await,
            Err(LlmError::NotConfigured)
        ));
    }
}
