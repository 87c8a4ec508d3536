//! Apply command - Interpret a request and apply it to a project document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use atelier_interpret::PromptRequest;
use atelier_model::ModelError;
use clap::Args;
use serde_json::json;
use tracing::info;

use super::{engine, load_document, print_json, GlobalArgs};

#[derive(Args)]
pub struct ApplyArgs {
    /// The edit request
    prompt: String,

    /// Project document to edit
    #[arg(short, long)]
    project: PathBuf,

    /// Id of the component to edit
    #[arg(short, long)]
    component: String,

    /// Write the updated document back
    #[arg(long)]
    write: bool,
}

pub async fn execute(args: ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let engine = engine(global)?;
    let mut document = load_document(&args.project)?;
    let mut tree = document.tree()?;

    let node = tree
        .get(&args.component)
        .ok_or_else(|| ModelError::NodeNotFound(args.component.clone()))?;
    let request = PromptRequest::new(args.prompt)
        .component_type(node.component_type.clone())
        .current_style(node.style())
        .current_props(node.props.clone());

    let outcome = engine.interpret_prompt(&request).await;
    let applied = !outcome.changes.is_empty();
    if applied {
        tree.apply_changes(&args.component, &outcome.changes)?;
    }
    let component = tree.get(&args.component).cloned();

    if applied && args.write {
        document.components = tree.into_nodes();
        let content = serde_json::to_string_pretty(&document)?;
        std::fs::write(&args.project, content + "\n")
            .with_context(|| format!("Failed to write {}", args.project.display()))?;
        info!("Updated {}", args.project.display());
    }

    print_json(&json!({
        "applied": applied,
        "outcome": outcome,
        "component": component,
    }))
}
