//! Whole-application generation.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atelier_model::{slugify, ComponentNode, ComponentTree, ModelError, Page, ProjectDocument};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{CodegenError, CodegenResult};
use crate::files::write_if_changed;
use crate::index::FileIndex;
use crate::locks::ProjectLocks;
use crate::naming::assign_base_names;
use crate::sync::{PageSynchronizer, SyncReport};
use crate::templates::{html_escape, render_template, SCAFFOLD};

/// Index location relative to the output directory.
pub const INDEX_PATH: &str = ".atelier/file-index.json";

/// Port the generated API server listens on.
pub const DEFAULT_API_PORT: u16 = 3001;

const FALLBACK_SLUG: &str = "atelier-app";

/// Generates a runnable application from pages and component nodes.
pub struct ProjectGenerator {
    output_dir: PathBuf,
    name: Option<String>,
    api_port: u16,
    locks: Arc<ProjectLocks>,
}

impl ProjectGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            name: None,
            api_port: DEFAULT_API_PORT,
            locks: ProjectLocks::shared(),
        }
    }

    /// Project name used in titles and package names.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_api_port(mut self, port: u16) -> Self {
        self.api_port = port;
        self
    }

    pub fn with_locks(mut self, locks: Arc<ProjectLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_PATH)
    }

    /// Generate from a project document, taking its name when none was set.
    pub fn render_document(&self, document: &ProjectDocument) -> CodegenResult<SyncReport> {
        let name = self
            .name
            .clone()
            .or_else(|| Some(document.name.clone()).filter(|n| !n.trim().is_empty()))
            .unwrap_or_else(|| self.app_name());
        self.generate(&document.components, &document.pages, &name)
    }

    /// Generate or update the application.
    ///
    /// Holds the project lock for the whole run. The file index is persisted
    /// last, and only if every write, rename and delete succeeded.
    pub fn render_project(&self, nodes: &[ComponentNode], pages: &[Page]) -> CodegenResult<SyncReport> {
        self.generate(nodes, pages, &self.app_name())
    }

    fn generate(&self, nodes: &[ComponentNode], pages: &[Page], name: &str) -> CodegenResult<SyncReport> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(CodegenError::InvalidOutput(self.output_dir.clone()));
        }

        let lock = self.locks.for_project(&self.output_dir);
        let _guard = lock.lock();

        let tree = ComponentTree::new(nodes.to_vec())?;
        let pages = effective_pages(pages)?;
        let default_page = pages.first().map(|p| p.id.as_str());

        let nodes_by_page: HashMap<String, Vec<ComponentNode>> = pages
            .iter()
            .map(|page| {
                let owned: Vec<ComponentNode> = tree
                    .nodes_for_page(&page.id, default_page)
                    .into_iter()
                    .cloned()
                    .collect();
                (page.id.clone(), owned)
            })
            .collect();

        let index_path = self.index_path();
        let previous = FileIndex::load(&index_path)?;

        let synchronizer = PageSynchronizer::new(self.output_dir.join("frontend"));
        let mut report = synchronizer.sync(&pages, &nodes_by_page, &previous)?;

        let variables = self.scaffold_variables(&pages, name);
        for file in SCAFFOLD {
            let path = self.output_dir.join(file.path);
            if write_if_changed(&path, &render_template(file.template, &variables))? {
                report.written.push(path);
            } else {
                report.unchanged += 1;
            }
        }

        if report.index.save_if_changed(&previous, &index_path)? {
            info!("Updated file index {}", index_path.display());
        }

        info!(
            "Rendered {} pages into {} ({} files written)",
            pages.len(),
            self.output_dir.display(),
            report.written.len()
        );
        Ok(report)
    }

    fn app_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.output_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| FALLBACK_SLUG.to_string())
    }

    fn scaffold_variables(&self, pages: &[Page], name: &str) -> HashMap<String, String> {
        let slug = Some(slugify(name))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_SLUG.to_string());
        let bases = assign_base_names(pages);

        let mut vars = HashMap::new();
        vars.insert("app_slug".to_string(), slug);
        vars.insert("title".to_string(), html_escape(name));
        vars.insert("api_port".to_string(), self.api_port.to_string());
        vars.insert(
            "page_imports".to_string(),
            bases
                .iter()
                .map(|base| format!("import {} from './pages/{}';", base, base))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        vars.insert("routes".to_string(), route_elements(pages, &bases));
        vars.insert(
            "nav_links".to_string(),
            pages
                .iter()
                .map(|page| {
                    format!(
                        "  {{ to: {}, label: {} }},",
                        Value::String(page.route()),
                        Value::String(page.name.clone())
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        );
        let listing: Vec<Value> = pages
            .iter()
            .map(|p| json!({"id": p.id, "name": p.name, "route": p.route()}))
            .collect();
        vars.insert(
            "pages_json".to_string(),
            serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "[]".to_string()),
        );
        vars
    }
}

/// The pages to generate. An empty list yields a single home page.
fn effective_pages(pages: &[Page]) -> CodegenResult<Vec<Page>> {
    if pages.is_empty() {
        return Ok(vec![Page::new("home", "Home").with_route("/")]);
    }
    let mut seen = HashSet::new();
    for page in pages {
        if !seen.insert(page.id.as_str()) {
            return Err(ModelError::InvalidDocument(format!("duplicate page id '{}'", page.id)).into());
        }
    }
    Ok(pages.to_vec())
}

/// `<Route>` elements, one per distinct route. `/` falls back to the first
/// page when no page claims it.
fn route_elements(pages: &[Page], bases: &[String]) -> String {
    let mut lines = Vec::new();
    let mut routes = HashSet::new();

    if !pages.iter().any(|p| p.route() == "/") {
        if let Some(first) = bases.first() {
            lines.push(route_line("/", first));
            routes.insert("/".to_string());
        }
    }

    for (page, base) in pages.iter().zip(bases) {
        let route = page.route();
        if !routes.insert(route.clone()) {
            warn!("Route {} of page {} is already taken, skipping", route, page.name);
            continue;
        }
        lines.push(route_line(&route, base));
    }
    lines.join("\n")
}

fn route_line(route: &str, base: &str) -> String {
    format!(
        "        <Route path={} element={{<{} />}} />",
        Value::String(route.to_string()),
        base
    )
}
