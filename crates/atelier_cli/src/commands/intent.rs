//! Intent command - Restate a request that produced no patch.

use anyhow::Result;
use atelier_interpret::{clarify, guess_intent};
use clap::Args;
use serde_json::json;

use super::print_json;

#[derive(Args)]
pub struct IntentArgs {
    /// The unclear request
    prompt: String,

    /// Component type, e.g. `button`
    #[arg(long = "type")]
    component_type: Option<String>,
}

pub fn execute(args: IntentArgs) -> Result<()> {
    let component_type = args.component_type.as_deref();
    print_json(&json!({
        "guess": guess_intent(&args.prompt, component_type),
        "clarification": clarify(&args.prompt, component_type),
    }))
}
