//! Action command - Turn a click behavior request into a handler.

use std::path::PathBuf;

use anyhow::Result;
use atelier_interpret::ActionRequest;
use clap::Args;

use super::{engine, load_document, parse_json_arg, print_json, GlobalArgs};

#[derive(Args)]
pub struct ActionArgs {
    /// What the component should do, e.g. "go to the about page"
    message: String,

    /// Component type, e.g. `button`
    #[arg(long = "type")]
    component_type: Option<String>,

    /// Component id
    #[arg(long)]
    id: Option<String>,

    /// Current props as a JSON object
    #[arg(long)]
    props: Option<String>,

    /// Project document whose pages are navigation targets
    #[arg(long)]
    project: Option<PathBuf>,
}

pub async fn execute(args: ActionArgs, global: &GlobalArgs) -> Result<()> {
    let engine = engine(global)?;

    let mut request = ActionRequest::new(args.message);
    request.component_type = args.component_type;
    request.component_id = args.id;
    request.current_props = parse_json_arg(args.props.as_deref(), "props")?;
    if let Some(path) = &args.project {
        request.pages = load_document(path)?.pages;
    }

    let result = engine.interpret_action(&request).await;
    print_json(&result)
}
