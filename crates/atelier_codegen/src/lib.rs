//! # atelier_codegen
//!
//! Compiles an Atelier component tree into a React application.
//!
//! ## Key Features
//!
//! - **JSX rendering**: one element per node, tree-edge and inline children unioned
//! - **Scoped CSS**: styles become class rules; custom pseudo selectors are prefixed
//! - **Stable files**: a page id keeps its files across renames
//! - **Orphan sweep**: files of deleted pages and strays are removed
//! - **Idempotent output**: unchanged content is never rewritten
//!
//! ## Layout
//!
//! ```text
//! <output>/
//! ├── .atelier/file-index.json
//! ├── frontend/
//! │   ├── package.json, index.html, vite.config.js
//! │   └── src/
//! │       ├── main.jsx, App.jsx, index.css
//! │       ├── components/Navigation.jsx
//! │       ├── pages/<Name>Page.jsx
//! │       └── styles/<Name>Page.css
//! ├── backend/package.json, server.js
//! ├── Dockerfile
//! └── docker-compose.yml
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use atelier_codegen::ProjectGenerator;
//! use atelier_model::{ComponentNode, Page};
//!
//! let nodes = vec![ComponentNode::new("hero", "section").with_text("Welcome")];
//! let pages = vec![Page::new("p1", "Home").with_route("/")];
//!
//! let report = ProjectGenerator::new("./out")
//!     .with_name("Shop")
//!     .render_project(&nodes, &pages)
//!     .unwrap();
//! println!("{} files written", report.written.len());
//! ```

pub mod css;
pub mod error;
pub mod files;
pub mod index;
pub mod jsx;
pub mod locks;
pub mod naming;
pub mod project;
pub mod sync;
pub mod templates;

pub use css::{node_css, scope_custom_css, style_rule};
pub use error::{CodegenError, CodegenResult};
pub use index::{FileIndex, PageFiles};
pub use jsx::{handler_expression, render, JsxRenderer, RenderOutput};
pub use locks::ProjectLocks;
pub use naming::{assign_base_names, component_class, page_base_name, sanitize_id};
pub use project::{ProjectGenerator, DEFAULT_API_PORT, INDEX_PATH};
pub use sync::{render_page, PageSynchronizer, RenamedFile, SyncReport};
