//! CLI command definitions.
//!
//! Every subcommand prints its result as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atelier_interpret::{FileSettings, InterpreterConfig, PromptEngine};
use atelier_model::ProjectDocument;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub mod action;
pub mod apply;
pub mod intent;
pub mod interpret;
pub mod models;
pub mod render;

/// Atelier - no-code app builder backend
#[derive(Parser)]
#[command(name = "atelier")]
#[command(version, about = "Atelier - interpret edit requests and generate React apps")]
#[command(long_about = r#"
Atelier turns plain-language edit requests into component patches and
compiles component trees into a runnable React application.

COMMANDS:
  interpret  → Turn an edit request into a change patch
  action     → Turn a click behavior request into a handler
  intent     → Restate a request that produced no patch
  apply      → Interpret a request and apply it to a project document
  render     → Generate or update the application for a project document
  models     → List models the configured backend serves

CONFIGURATION:
  A YAML settings file (--config or ATELIER_CONFIG) selects the provider,
  models and consensus strategy. Without one only pattern rules are used.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Generation error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings file (YAML)
    #[arg(long, global = true, env = "ATELIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key for the generative backend
    #[arg(long, global = true, env = "ATELIER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn an edit request into a change patch
    Interpret(interpret::InterpretArgs),

    /// Turn a click behavior request into a handler
    Action(action::ActionArgs),

    /// Restate a request that produced no patch
    Intent(intent::IntentArgs),

    /// Interpret a request and apply it to a component of a project document
    Apply(apply::ApplyArgs),

    /// Generate or update the application for a project document
    Render(render::RenderArgs),

    /// List models the configured backend serves
    Models,
}

/// Component context accepted by the interpreting commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ComponentArgs {
    /// Component type, e.g. `button`
    #[arg(long = "type")]
    pub component_type: Option<String>,

    /// Current style as a JSON object
    #[arg(long)]
    pub style: Option<String>,

    /// Current props as a JSON object
    #[arg(long)]
    pub props: Option<String>,
}

/// Interpreter configuration from the settings file, with the API key
/// overlaid.
pub fn load_config(global: &GlobalArgs) -> Result<InterpreterConfig> {
    let mut config = match &global.config {
        Some(path) => {
            let settings = FileSettings::open(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            InterpreterConfig::from_settings(&settings)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        }
        None => InterpreterConfig::pattern_only(),
    };
    if let Some(key) = global.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(key.clone());
    }
    debug!("Using provider {:?}", config.provider);
    Ok(config)
}

pub fn engine(global: &GlobalArgs) -> Result<PromptEngine> {
    Ok(PromptEngine::new(load_config(global)?))
}

/// Parse an optional JSON argument.
pub fn parse_json_arg<T: DeserializeOwned>(raw: Option<&str>, name: &str) -> Result<Option<T>> {
    raw.map(|raw| {
        serde_json::from_str(raw).with_context(|| format!("--{} must be a JSON object", name))
    })
    .transpose()
}

pub fn load_document(path: &Path) -> Result<ProjectDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project document {}", path.display()))?;
    ProjectDocument::from_json_str(&content)
        .with_context(|| format!("Invalid project document {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_interpret::Provider;
    use atelier_model::StyleMap;

    #[test]
    fn test_parse_json_arg() {
        let style: Option<StyleMap> =
            parse_json_arg(Some(r##"{"color": "#fff"}"##), "style").unwrap();
        assert_eq!(style.unwrap().get("color").map(String::as_str), Some("#fff"));

        assert!(parse_json_arg::<StyleMap>(None, "style").unwrap().is_none());
        assert!(parse_json_arg::<StyleMap>(Some("nope"), "style").is_err());
    }

    #[test]
    fn test_load_config_with_key_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.yaml");
        std::fs::write(&path, "provider: openai\nmodel: gpt-4o-mini\n").unwrap();

        let global = GlobalArgs {
            config: Some(path),
            api_key: Some("sk-test".to_string()),
            verbose: false,
        };
        let config = load_config(&global).unwrap();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_no_config_is_pattern_only() {
        let global = GlobalArgs {
            config: None,
            api_key: None,
            verbose: false,
        };
        assert!(!load_config(&global).unwrap().is_generative());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "atelier",
            "interpret",
            "make background blue",
            "--type",
            "div",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Interpret(_)));
    }
}
