//! Render command - Generate or update the application for a project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use atelier_codegen::ProjectGenerator;
use clap::Args;
use tracing::info;

use super::{load_document, print_json};

#[derive(Args)]
pub struct RenderArgs {
    /// Project document (JSON with `pages` and `components`)
    #[arg(short, long)]
    project: PathBuf,

    /// Output directory of the generated application
    #[arg(short, long)]
    output: PathBuf,

    /// Project name; defaults to the document's name
    #[arg(long)]
    name: Option<String>,

    /// Port of the generated API server
    #[arg(long)]
    port: Option<u16>,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let document = load_document(&args.project)?;

    let mut generator = ProjectGenerator::new(&args.output);
    if let Some(name) = args.name {
        generator = generator.with_name(name);
    }
    if let Some(port) = args.port {
        generator = generator.with_api_port(port);
    }

    let report = generator
        .render_document(&document)
        .with_context(|| format!("Failed to render into {}", args.output.display()))?;
    info!(
        "{} written, {} renamed, {} removed",
        report.written.len(),
        report.renamed.len(),
        report.removed.len()
    );
    print_json(&report)
}
