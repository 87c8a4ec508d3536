//! Interpret command - Turn an edit request into a change patch.

use anyhow::Result;
use atelier_interpret::PromptRequest;
use clap::Args;
use tracing::info;

use super::{engine, parse_json_arg, print_json, ComponentArgs, GlobalArgs};

#[derive(Args)]
pub struct InterpretArgs {
    /// The edit request, e.g. "make background blue"
    prompt: String,

    #[command(flatten)]
    component: ComponentArgs,
}

pub async fn execute(args: InterpretArgs, global: &GlobalArgs) -> Result<()> {
    let engine = engine(global)?;

    let mut request = PromptRequest::new(args.prompt);
    request.component_type = args.component.component_type;
    request.current_style = parse_json_arg(args.component.style.as_deref(), "style")?;
    request.current_props = parse_json_arg(args.component.props.as_deref(), "props")?;

    let outcome = engine.interpret_prompt(&request).await;
    info!("Interpretation source: {:?}", outcome.source);
    print_json(&outcome)
}
