//! Atelier CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Generation error

use std::process::ExitCode;

use atelier_codegen::CodegenError;
use atelier_interpret::LlmError;
use atelier_model::ModelError;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const GENERATION_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.global.verbose { "atelier=debug" } else { "atelier=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},warn", default_level))
    });
    // stdout carries the JSON results, logs go to stderr
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Interpret(args) => commands::interpret::execute(args, &cli.global).await,
        Commands::Action(args) => commands::action::execute(args, &cli.global).await,
        Commands::Intent(args) => commands::intent::execute(args),
        Commands::Apply(args) => commands::apply::execute(args, &cli.global).await,
        Commands::Render(args) => commands::render::execute(args),
        Commands::Models => commands::models::execute(&cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error chain to an exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CodegenError>() {
            return match err {
                CodegenError::Model(_) => ExitCodes::VALIDATION_FAILURE,
                CodegenError::InvalidOutput(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERATION_ERROR,
            };
        }
        if cause.is::<ModelError>() {
            return ExitCodes::VALIDATION_FAILURE;
        }
        if let Some(err) = cause.downcast_ref::<LlmError>() {
            return match err {
                LlmError::Config(_) | LlmError::Yaml(_) | LlmError::NotConfigured => {
                    ExitCodes::INVALID_ARGS
                }
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.is::<serde_json::Error>() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_error() {
        let model: anyhow::Error = ModelError::DuplicateId("a".to_string()).into();
        assert_eq!(categorize_error(&model), ExitCodes::VALIDATION_FAILURE);

        let wrapped = Err::<(), _>(CodegenError::InvalidOutput("x".into()))
            .context("rendering")
            .unwrap_err();
        assert_eq!(categorize_error(&wrapped), ExitCodes::INVALID_ARGS);

        let io: anyhow::Error = CodegenError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")).into();
        assert_eq!(categorize_error(&io), ExitCodes::GENERATION_ERROR);

        let config: anyhow::Error = LlmError::Config("bad".to_string()).into();
        assert_eq!(categorize_error(&config), ExitCodes::INVALID_ARGS);

        assert_eq!(categorize_error(&anyhow::anyhow!("boom")), ExitCodes::GENERAL_ERROR);
    }
}
