//! Integration tests for application generation.
//!
//! Every test renders into its own temporary directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atelier_codegen::{CodegenError, FileIndex, ProjectGenerator, ProjectLocks, INDEX_PATH};
use atelier_model::{ComponentNode, Page};
use walkdir::WalkDir;

fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let content = fs::read_to_string(e.path()).unwrap();
            (e.path().strip_prefix(root).unwrap().to_path_buf(), content)
        })
        .collect()
}

fn sample_nodes() -> Vec<ComponentNode> {
    vec![
        ComponentNode::new("hero", "section").with_style("padding", "24px"),
        ComponentNode::new("title", "h1").with_parent("hero").with_text("Welcome"),
        ComponentNode::new("team", "div")
            .with_prop("pageId", "p2")
            .with_text("Our team"),
    ]
}

fn home_and_about() -> Vec<Page> {
    vec![
        Page::new("p1", "Home").with_route("/"),
        Page::new("p2", "About"),
    ]
}

fn generator(dir: &Path) -> ProjectGenerator {
    ProjectGenerator::new(dir.join("app"))
        .with_name("Shop")
        .with_locks(Arc::new(ProjectLocks::new()))
}

/// The structural layout of a generated app is complete.
#[test]
fn test_generates_application_layout() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    generator.render_project(&sample_nodes(), &home_and_about()).unwrap();

    let out = generator.output_dir();
    for file in [
        INDEX_PATH,
        "frontend/package.json",
        "frontend/index.html",
        "frontend/vite.config.js",
        "frontend/src/main.jsx",
        "frontend/src/App.jsx",
        "frontend/src/index.css",
        "frontend/src/components/Navigation.jsx",
        "frontend/src/pages/HomePage.jsx",
        "frontend/src/pages/AboutPage.jsx",
        "frontend/src/styles/HomePage.css",
        "frontend/src/styles/AboutPage.css",
        "backend/package.json",
        "backend/server.js",
        "Dockerfile",
        "docker-compose.yml",
    ] {
        assert!(out.join(file).is_file(), "missing {}", file);
    }

    let home = fs::read_to_string(out.join("frontend/src/pages/HomePage.jsx")).unwrap();
    assert!(home.contains("export default function HomePage()"));
    assert!(home.contains("<h1 className=\"component-title\" id=\"title\">Welcome</h1>"));
    assert!(!home.contains("Our team"));

    let about = fs::read_to_string(out.join("frontend/src/pages/AboutPage.jsx")).unwrap();
    assert!(about.contains("Our team"));

    let app = fs::read_to_string(out.join("frontend/src/App.jsx")).unwrap();
    assert!(app.contains("import AboutPage from './pages/AboutPage';"));
    assert!(app.contains("<Route path=\"/about\" element={<AboutPage />} />"));
    assert!(app.contains("<Route path=\"*\" element={<Navigate to=\"/\" replace />} />"));

    let package = fs::read_to_string(out.join("frontend/package.json")).unwrap();
    assert!(package.contains("\"name\": \"shop\""));
    assert!(!snapshot(out).values().any(|content| content.contains("{{")));
}

/// A second run with the same input changes nothing.
#[test]
fn test_regeneration_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());

    let first = generator.render_project(&sample_nodes(), &home_and_about()).unwrap();
    assert!(!first.written.is_empty());
    let before = snapshot(generator.output_dir());

    let second = generator.render_project(&sample_nodes(), &home_and_about()).unwrap();
    assert!(second.is_noop(), "unexpected changes: {:?}", second);
    assert_eq!(second.unchanged, first.written.len());
    assert_eq!(snapshot(generator.output_dir()), before);
}

/// Renaming a page moves its files instead of duplicating them.
#[test]
fn test_rename_moves_files() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    generator.render_project(&sample_nodes(), &home_and_about()).unwrap();

    let renamed = vec![
        Page::new("p1", "Landing").with_route("/"),
        Page::new("p2", "About"),
    ];
    let report = generator.render_project(&sample_nodes(), &renamed).unwrap();
    assert_eq!(report.renamed.len(), 2);
    assert!(report.removed.is_empty());

    let pages_dir = generator.output_dir().join("frontend/src/pages");
    assert!(!pages_dir.join("HomePage.jsx").exists());
    assert!(!generator.output_dir().join("frontend/src/styles/HomePage.css").exists());

    let landing = fs::read_to_string(pages_dir.join("LandingPage.jsx")).unwrap();
    assert!(landing.contains("export default function LandingPage()"));
    assert!(landing.contains("import '../styles/LandingPage.css';"));

    let app = fs::read_to_string(generator.output_dir().join("frontend/src/App.jsx")).unwrap();
    assert!(!app.contains("HomePage"));

    let index = FileIndex::load(&generator.index_path()).unwrap();
    assert_eq!(index.get("p1").unwrap().base_name, "LandingPage");
}

/// Removed pages and stray files disappear on the next sync.
#[test]
fn test_orphans_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    generator.render_project(&sample_nodes(), &home_and_about()).unwrap();

    let stray = generator.output_dir().join("frontend/src/pages/Leftover.jsx");
    fs::write(&stray, "export default null;\n").unwrap();

    let report = generator
        .render_project(&sample_nodes(), &[Page::new("p1", "Home").with_route("/")])
        .unwrap();

    let out = generator.output_dir();
    assert!(!out.join("frontend/src/pages/AboutPage.jsx").exists());
    assert!(!out.join("frontend/src/styles/AboutPage.css").exists());
    assert!(!stray.exists());
    assert_eq!(report.removed.len(), 3);

    let index = FileIndex::load(&generator.index_path()).unwrap();
    assert!(index.get("p2").is_none());
}

/// Bare pseudo selectors never reach the stylesheet unscoped.
#[test]
fn test_custom_css_is_scoped() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    let nodes = vec![ComponentNode::new("buy_btn", "button")
        .with_text("Buy")
        .with_prop("customCSS", ":hover {\n  background-color: #ff0000;\n}")];

    generator
        .render_project(&nodes, &[Page::new("p1", "Home").with_route("/")])
        .unwrap();

    let css = fs::read_to_string(generator.output_dir().join("frontend/src/styles/HomePage.css")).unwrap();
    assert!(css.contains(".component-buy-btn:hover {"));
    assert!(!css.lines().any(|line| line.trim_start().starts_with(':')));
}

/// Author props reach the page module as attributes and callable handlers.
#[test]
fn test_author_props_in_page_module() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    let nodes = vec![
        ComponentNode::new("signup", "form").with_prop("id", "sign up_form.main"),
        ComponentNode::new("email", "input")
            .with_parent("signup")
            .with_prop("required", true)
            .with_prop("className", "wide")
            .with_prop("onChange", "(e) => setEmail(e.target.value)"),
        ComponentNode::new("send", "button")
            .with_parent("signup")
            .with_prop("onClick", "#submitForm()")
            .with_text("Send"),
    ];

    generator
        .render_project(&nodes, &[Page::new("p1", "Home").with_route("/")])
        .unwrap();

    let home = fs::read_to_string(generator.output_dir().join("frontend/src/pages/HomePage.jsx")).unwrap();
    assert!(home.contains("<form className=\"component-signup\" id=\"sign-up-form-main\">"));
    assert!(home.contains(
        "<input className=\"component-email wide\" id=\"email\" required onChange={(e) => setEmail(e.target.value)} />"
    ));
    assert!(home.contains("onClick={() => { submitForm() }}>Send</button>"));
    assert!(!home.contains("\"#"));
}

/// Without pages a single home page receives every node.
#[test]
fn test_default_home_page() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    generator.render_project(&[ComponentNode::new("a", "div")], &[]).unwrap();

    let home = fs::read_to_string(generator.output_dir().join("frontend/src/pages/HomePage.jsx")).unwrap();
    assert!(home.contains("id=\"a\""));
}

/// Malformed trees are rejected before anything is written.
#[test]
fn test_cyclic_tree_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());
    let nodes = vec![
        ComponentNode::new("x", "div").with_parent("y"),
        ComponentNode::new("y", "div").with_parent("x"),
    ];

    let result = generator.render_project(&nodes, &home_and_about());
    assert!(matches!(result, Err(CodegenError::Model(_))));
    assert!(!generator.index_path().exists());
}

#[test]
fn test_output_must_be_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app");
    fs::write(&file, "not a directory").unwrap();

    let result = generator(dir.path()).render_project(&sample_nodes(), &home_and_about());
    assert!(matches!(result, Err(CodegenError::InvalidOutput(_))));
}

/// Concurrent renders of one project serialize and agree on the result.
#[test]
fn test_concurrent_renders_serialize() {
    let dir = tempfile::tempdir().unwrap();
    let locks = Arc::new(ProjectLocks::new());
    let out = dir.path().join("app");

    std::thread::scope(|scope| {
        for name in ["Home", "Start"] {
            let locks = Arc::clone(&locks);
            let out = out.clone();
            scope.spawn(move || {
                ProjectGenerator::new(out)
                    .with_locks(locks)
                    .render_project(&sample_nodes(), &[Page::new("p1", name).with_route("/")])
                    .unwrap();
            });
        }
    });

    let index = FileIndex::load(&out.join(INDEX_PATH)).unwrap();
    let base = &index.get("p1").unwrap().base_name;
    let pages: Vec<_> = fs::read_dir(out.join("frontend/src/pages"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(pages, vec![format!("{}.jsx", base)]);
}
