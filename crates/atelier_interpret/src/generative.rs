//! Generative interpretation through a [`TextGenerator`].

use atelier_model::Changes;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::repair::changes_from_output;

/// Patch extracted from a model, with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPatch {
    pub changes: Changes,
    pub raw: String,
}

/// Ask one model for text; `None` on any failure.
///
/// A missing model triggers a model listing so the log says what is
/// actually available.
pub async fn generate_text(generator: &dyn TextGenerator, request: &GenerationRequest) -> Option<String> {
    match generator.generate(request).await {
        Ok(text) => Some(text),
        Err(LlmError::ModelNotFound(model)) => {
            match generator.list_models().await {
                Ok(models) if !models.is_empty() => warn!(
                    "Model '{}' not found on {}; available: {}",
                    model,
                    generator.name(),
                    models.join(", ")
                ),
                Ok(_) => warn!("Model '{}' not found on {}; no models available", model, generator.name()),
                Err(e) => warn!("Model '{}' not found and listing failed: {}", model, e),
            }
            None
        }
        Err(e) => {
            warn!("Generation with {} failed: {}", request.model, e);
            None
        }
    }
}

/// Interpret a prompt with a single model.
///
/// Returns `None` when the backend fails or its output holds no usable
/// patch; the caller falls back to pattern matching.
pub async fn interpret_via_model(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> Option<ModelPatch> {
    let raw = generate_text(generator, request).await?;
    match changes_from_output(&raw) {
        Some(changes) => Some(ModelPatch { changes, raw }),
        None => {
            debug!("No patch in output of {}", request.model);
            None
        }
    }
}
