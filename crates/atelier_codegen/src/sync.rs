//! Page and stylesheet file synchronization.
//!
//! Each page owns `src/pages/<Base>.jsx` and `src/styles/<Base>.css` under
//! the frontend directory, where `<Base>` derives from the page name. The
//! page id is the identity: a renamed page moves its files, a removed page
//! loses them, and anything else found in the managed directories is swept.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use atelier_model::{ComponentNode, ComponentTree, Page};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{CodegenError, CodegenResult};
use crate::files::{remove_if_exists, write_if_changed};
use crate::index::{FileIndex, PageFiles};
use crate::jsx::JsxRenderer;
use crate::naming::assign_base_names;

/// Directories whose contents belong entirely to the synchronizer.
pub const MANAGED_DIRS: &[&str] = &["src/pages", "src/styles"];

/// A file moved to follow a page rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// What one sync changed on disk.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub renamed: Vec<RenamedFile>,
    pub removed: Vec<PathBuf>,
    pub unchanged: usize,
    #[serde(skip)]
    pub index: FileIndex,
}

impl SyncReport {
    /// Whether the sync touched the file system at all.
    pub fn is_noop(&self) -> bool {
        self.written.is_empty() && self.renamed.is_empty() && self.removed.is_empty()
    }
}

/// Writes page files below a frontend directory.
pub struct PageSynchronizer {
    frontend_dir: PathBuf,
}

impl PageSynchronizer {
    pub fn new(frontend_dir: impl Into<PathBuf>) -> Self {
        Self {
            frontend_dir: frontend_dir.into(),
        }
    }

    pub fn frontend_dir(&self) -> &Path {
        &self.frontend_dir
    }

    /// Bring the page files in line with `pages`.
    ///
    /// `existing` is the index from the previous sync. The updated index is
    /// returned in the report; persisting it is left to the caller so that it
    /// happens only after every file operation succeeded.
    pub fn sync(
        &self,
        pages: &[Page],
        nodes_by_page: &HashMap<String, Vec<ComponentNode>>,
        existing: &FileIndex,
    ) -> CodegenResult<SyncReport> {
        let targets: Vec<PageFiles> = assign_base_names(pages)
            .iter()
            .map(|base| PageFiles::new(base))
            .collect();
        let claimed: HashSet<PathBuf> = targets
            .iter()
            .flat_map(|files| [self.path(&files.component_file), self.path(&files.css_file)])
            .collect();

        let mut report = SyncReport::default();

        for (page, files) in pages.iter().zip(&targets) {
            if let Some(previous) = existing.get(&page.id) {
                if previous != files {
                    self.follow_rename(&previous.component_file, &files.component_file, &claimed, &mut report)?;
                    self.follow_rename(&previous.css_file, &files.css_file, &claimed, &mut report)?;
                }
            }

            let empty = Vec::new();
            let nodes = nodes_by_page.get(&page.id).unwrap_or(&empty);
            let (component, css) = render_page(page, &files.base_name, nodes);

            for (relative, content) in [(&files.component_file, component), (&files.css_file, css)] {
                let path = self.path(relative);
                if write_if_changed(&path, &content)? {
                    report.written.push(path);
                } else {
                    report.unchanged += 1;
                }
            }

            report.index.pages.insert(page.id.clone(), files.clone());
        }

        for (page_id, files) in &existing.pages {
            if report.index.pages.contains_key(page_id) {
                continue;
            }
            for relative in [&files.component_file, &files.css_file] {
                let path = self.path(relative);
                if !claimed.contains(&path) && remove_if_exists(&path)? {
                    info!("Removed {} of deleted page {}", path.display(), page_id);
                    report.removed.push(path);
                }
            }
        }

        self.sweep_orphans(&claimed, &mut report)?;

        info!(
            "Synced {} pages: {} written, {} renamed, {} removed, {} unchanged",
            pages.len(),
            report.written.len(),
            report.renamed.len(),
            report.removed.len(),
            report.unchanged
        );
        Ok(report)
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.frontend_dir.join(relative)
    }

    /// Move a page's old file to its new name. Files another page now claims
    /// are left for that page to overwrite.
    fn follow_rename(
        &self,
        from: &str,
        to: &str,
        claimed: &HashSet<PathBuf>,
        report: &mut SyncReport,
    ) -> CodegenResult<()> {
        let from = self.path(from);
        let to = self.path(to);
        if from == to || claimed.contains(&from) || !from.exists() {
            return Ok(());
        }

        if remove_if_exists(&to)? {
            debug!("Replaced existing {} during rename", to.display());
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| CodegenError::file("create", parent, e))?;
        }
        fs::rename(&from, &to).map_err(|e| CodegenError::file("rename", &from, e))?;
        info!("Renamed {} -> {}", from.display(), to.display());
        report.renamed.push(RenamedFile { from, to });
        Ok(())
    }

    fn sweep_orphans(&self, claimed: &HashSet<PathBuf>, report: &mut SyncReport) -> CodegenResult<()> {
        for managed in MANAGED_DIRS {
            let dir = self.path(managed);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
                let entry = entry?;
                if !entry.file_type().is_file() || claimed.contains(entry.path()) {
                    continue;
                }
                let path = entry.into_path();
                if remove_if_exists(&path)? {
                    info!("Removed orphan {}", path.display());
                    report.removed.push(path);
                }
            }
        }
        Ok(())
    }
}

/// Component module and stylesheet for one page.
pub fn render_page(page: &Page, base_name: &str, nodes: &[ComponentNode]) -> (String, String) {
    let tree = ComponentTree::unchecked(nodes.to_vec());
    let renderer = JsxRenderer::new(&tree);
    let markup = renderer.render_markup(3);
    let page_class = format!("page page-{}", page_slug(page));

    let body = if markup.is_empty() {
        format!("    <main className=\"{}\" />\n", page_class)
    } else {
        format!(
            "    <main className=\"{}\">\n{}    </main>\n",
            page_class, markup
        )
    };

    let component = format!(
        "import React from 'react';\nimport '../styles/{base}.css';\n\n\
         export default function {base}() {{\n  return (\n{body}  );\n}}\n",
        base = base_name,
        body = body
    );

    let css = renderer.collect_css();
    let stylesheet = if css.is_empty() {
        format!("/* {} ({}) */\n", page.name, page.route())
    } else {
        format!("/* {} ({}) */\n\n{}", page.name, page.route(), css)
    };

    (component, stylesheet)
}

fn page_slug(page: &Page) -> String {
    let slug = atelier_model::slugify(&page.name);
    if slug.is_empty() {
        atelier_model::slugify(&page.id)
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_module() {
        let page = Page::new("p1", "Home").with_route("/");
        let nodes = vec![
            ComponentNode::new("a", "div").with_style("padding", "8px"),
            ComponentNode::new("b", "p").with_parent("a").with_text("hi"),
        ];
        let (component, css) = render_page(&page, "HomePage", &nodes);

        assert_eq!(
            component,
            "import React from 'react';\n\
             import '../styles/HomePage.css';\n\
             \n\
             export default function HomePage() {\n\
             \x20 return (\n\
             \x20   <main className=\"page page-home\">\n\
             \x20     <div className=\"component-a\" id=\"a\">\n\
             \x20       <p className=\"component-b\" id=\"b\">hi</p>\n\
             \x20     </div>\n\
             \x20   </main>\n\
             \x20 );\n\
             }\n"
        );
        assert_eq!(css, "/* Home (/) */\n\n.component-a {\n  padding: 8px;\n}\n");
    }

    #[test]
    fn test_empty_page() {
        let (component, css) = render_page(&Page::new("p1", "About"), "AboutPage", &[]);
        assert!(component.contains("<main className=\"page page-about\" />"));
        assert_eq!(css, "/* About (/about) */\n");
    }
}
