//! # atelier_interpret - Edit request interpretation for Atelier
//!
//! Turns free-text instructions ("make background blue", "when clicked go to
//! the about page") into [`atelier_model::Changes`] patches and click
//! handlers.
//!
//! ## Key Features
//!
//! - **Pattern rules**: a deterministic rule table that needs no backend
//! - **Generative backends**: Ollama or OpenAI-compatible HTTP APIs
//! - **Consensus**: several models queried concurrently, one answer selected
//! - **Tolerant parsing**: fenced, single-quoted or prose-wrapped JSON is repaired
//! - **Clarification**: empty results are restated or answered with examples
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ PromptEngine │────▶│ query_multi /   │────▶│ repair pipeline │
//! └──────┬───────┘     │ single model    │     └─────────────────┘
//!        │             └─────────────────┘
//!        ▼
//! ┌──────────────┐     ┌─────────────────┐
//! │ rule table   │────▶│ intent guessing │
//! └──────────────┘     └─────────────────┘
//! ```

pub mod action;
pub mod config;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod generative;
pub mod intent;
pub mod llm;
pub mod mock;
pub mod patterns;
pub mod prompts;
pub mod repair;

pub use action::{
    action_from_output, interpret_action_patterns, interpret_action_via_model, ActionRequest,
    ActionResult,
};
pub use config::{
    FileSettings, InterpreterConfig, MapSettings, Provider, SettingsProvider,
    DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECS,
};
pub use consensus::{query_multi, ConsensusResult, ModelAttempt, MultiQuery, Strategy};
pub use engine::{PromptEngine, PromptOutcome, PromptRequest, Source};
pub use error::{LlmError, LlmResult};
pub use generative::{interpret_via_model, ModelPatch};
pub use intent::{clarify, guess_intent, Clarification, IntentCategory};
pub use llm::{Dialect, GenerationRequest, HttpGenerator, TextGenerator};
pub use mock::MockGenerator;
pub use patterns::PatternInterpreter;
pub use repair::{changes_from_output, sanitize_handler};
