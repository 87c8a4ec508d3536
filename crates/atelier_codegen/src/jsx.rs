//! Component tree to JSX markup and CSS.
//!
//! Roots are nodes without a parent plus nodes whose parent is missing from
//! the rendered set. Each element gets the class `component-<id>`; styles go
//! to the stylesheet, never inline.

use std::collections::HashSet;

use atelier_model::{
    ComponentNode, ComponentTree, InlineChild, InlineChildren, Page, MAX_RENDER_DEPTH,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::css::node_css;
use crate::naming::{component_class, sanitize_id};

lazy_static! {
    static ref HANDLER_KEY: Regex = Regex::new(r"^on[A-Z][A-Za-z]*$").unwrap();
    static ref ATTRIBUTE_KEY: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap();
    static ref TAG_NAME: Regex = Regex::new(r"^[a-z][a-z0-9-]*$").unwrap();
    static ref ARROW_FN: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*\s*=>").unwrap();
}

/// Props that are consumed by the renderer instead of becoming attributes.
const RESERVED_PROPS: &[&str] = &["children", "style", "customCSS", "pageId", "className", "id"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Markup and stylesheet for a set of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub markup: String,
    pub css: String,
}

/// Render `nodes` as JSX plus CSS.
///
/// With a page, only nodes assigned to it or to no page are rendered.
pub fn render(nodes: &[ComponentNode], page: Option<&Page>) -> RenderOutput {
    let nodes: Vec<ComponentNode> = match page {
        Some(page) => nodes
            .iter()
            .filter(|n| n.page_id().map_or(true, |assigned| assigned == page.id))
            .cloned()
            .collect(),
        None => nodes.to_vec(),
    };
    let tree = ComponentTree::unchecked(nodes);
    let renderer = JsxRenderer::new(&tree);
    RenderOutput {
        markup: renderer.render_markup(0),
        css: renderer.collect_css(),
    }
}

/// Renderer over one page's nodes.
pub struct JsxRenderer<'a> {
    tree: &'a ComponentTree,
}

impl<'a> JsxRenderer<'a> {
    pub fn new(tree: &'a ComponentTree) -> Self {
        Self { tree }
    }

    /// Parentless nodes followed by detached ones, in list order.
    pub fn roots(&self) -> Vec<&'a ComponentNode> {
        self.tree
            .nodes()
            .iter()
            .filter(|n| match n.parent_id.as_deref() {
                None => true,
                Some(parent) => !self.tree.contains(parent),
            })
            .collect()
    }

    /// Markup for every root, each line indented by `indent` levels.
    pub fn render_markup(&self, indent: usize) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.render_node(root, 0, indent, &mut out);
        }
        out
    }

    fn render_node(&self, node: &ComponentNode, depth: usize, indent: usize, out: &mut String) {
        if depth > MAX_RENDER_DEPTH {
            warn!("Render depth cap reached at component {}", node.id);
            return;
        }

        let pad = "  ".repeat(indent);
        let tag = tag_name(&node.component_type);
        let attributes = attributes(node);
        let open = if attributes.is_empty() {
            tag.clone()
        } else {
            format!("{} {}", tag, attributes.join(" "))
        };

        let inline = node.inline_children();
        let children = self.tree.children_of(&node.id);

        if VOID_ELEMENTS.contains(&tag.as_str()) || (inline.is_empty() && children.is_empty()) {
            if !inline.is_empty() || !children.is_empty() {
                debug!("Dropping children of void element {} ({})", node.id, tag);
            }
            out.push_str(&format!("{}<{} />\n", pad, open));
            return;
        }

        if let InlineChildren::Text(text) = &inline {
            if children.is_empty() && !text.contains('\n') {
                out.push_str(&format!("{}<{}>{}</{}>\n", pad, open, jsx_text(text), tag));
                return;
            }
        }

        out.push_str(&format!("{}<{}>\n", pad, open));
        let inner = "  ".repeat(indent + 1);
        match inline {
            InlineChildren::None => {}
            InlineChildren::Text(text) => {
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    out.push_str(&format!("{}{}\n", inner, jsx_text(line)));
                }
            }
            InlineChildren::Items(items) => {
                for item in &items {
                    match item {
                        InlineChild::Text(text) => {
                            out.push_str(&format!("{}{}\n", inner, jsx_text(text)));
                        }
                        InlineChild::Node(child) => self.render_node(child, depth + 1, indent + 1, out),
                    }
                }
            }
        }
        for child in children {
            self.render_node(child, depth + 1, indent + 1, out);
        }
        out.push_str(&format!("{}</{}>\n", pad, tag));
    }

    /// CSS for every node exactly once, including nodes unreachable from a
    /// root and inline child nodes.
    pub fn collect_css(&self) -> String {
        let mut visited = HashSet::new();
        let mut rules = Vec::new();
        for root in self.roots() {
            self.collect_node_css(root, 0, &mut visited, &mut rules);
        }
        for node in self.tree.nodes() {
            if !visited.contains(node.id.as_str()) {
                debug!("Collecting CSS of unreachable component {}", node.id);
                self.collect_node_css(node, 0, &mut visited, &mut rules);
            }
        }
        rules.join("\n")
    }

    fn collect_node_css(
        &self,
        node: &ComponentNode,
        depth: usize,
        visited: &mut HashSet<String>,
        rules: &mut Vec<String>,
    ) {
        if depth > MAX_RENDER_DEPTH || !visited.insert(node.id.clone()) {
            return;
        }
        let css = node_css(node);
        if !css.is_empty() {
            rules.push(css);
        }
        if let InlineChildren::Items(items) = node.inline_children() {
            for item in items {
                if let InlineChild::Node(child) = item {
                    self.collect_node_css(&child, depth + 1, visited, rules);
                }
            }
        }
        for child in self.tree.children_of(&node.id) {
            self.collect_node_css(child, depth + 1, visited, rules);
        }
    }
}

/// Lowercase HTML tag for a component type. Unknown shapes become `div`.
fn tag_name(component_type: &str) -> String {
    let lowered = component_type.trim().to_ascii_lowercase();
    let tag = match lowered.as_str() {
        "text" => "span",
        "image" => "img",
        "container" => "div",
        "link" => "a",
        other => other,
    };
    if TAG_NAME.is_match(tag) {
        tag.to_string()
    } else {
        warn!("Unsupported component type '{}', rendering a div", component_type);
        "div".to_string()
    }
}

fn attributes(node: &ComponentNode) -> Vec<String> {
    let mut class = component_class(&node.id);
    if let Some(extra) = node.prop_str("className").map(str::trim).filter(|c| !c.is_empty()) {
        class.push(' ');
        class.push_str(extra);
    }

    let html_id = node
        .prop_str("id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(node.id.as_str());

    let mut attributes = vec![
        format!("className=\"{}\"", class),
        format!("id=\"{}\"", sanitize_id(html_id)),
    ];
    let mut handlers = Vec::new();

    for (key, value) in &node.props {
        if RESERVED_PROPS.contains(&key.as_str()) {
            continue;
        }
        if HANDLER_KEY.is_match(key) {
            match value.as_str().and_then(handler_expression) {
                Some(expression) => handlers.push(format!("{}={{{}}}", key, expression)),
                None => debug!("Skipping empty handler {} on {}", key, node.id),
            }
            continue;
        }
        if !ATTRIBUTE_KEY.is_match(key) {
            debug!("Skipping prop {} on {}", key, node.id);
            continue;
        }
        if let Some(attribute) = attribute(key, value) {
            attributes.push(attribute);
        }
    }

    attributes.extend(handlers);
    attributes
}

fn attribute(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some(key.to_string()),
        Value::String(s) if !s.contains(['"', '\\', '\n']) => Some(format!("{}=\"{}\"", key, s)),
        other => Some(format!("{}={{{}}}", key, other)),
    }
}

/// Turn a handler snippet into a callable expression.
///
/// A leading `#` is stripped. Snippets that are already function expressions
/// are kept; anything else is wrapped in `() => { ... }`.
pub fn handler_expression(code: &str) -> Option<String> {
    let code = code.trim();
    let code = code.strip_prefix('#').unwrap_or(code).trim();
    if code.is_empty() {
        return None;
    }
    let is_function = code.starts_with('(')
        || code.starts_with("function")
        || code.starts_with("async ")
        || ARROW_FN.is_match(code);
    if is_function {
        Some(code.to_string())
    } else {
        Some(format!("() => {{ {} }}", code))
    }
}

/// JSX text, falling back to a string expression when the text would not
/// survive as a bare child.
fn jsx_text(text: &str) -> String {
    let needs_expression =
        text.contains(['{', '}', '<', '>']) || text.trim() != text || text.is_empty();
    if needs_expression {
        format!("{{{}}}", Value::String(text.to_string()))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_text() {
        let output = render(&[
            ComponentNode::new("a", "div"),
            ComponentNode::new("b", "p").with_parent("a").with_text("hi"),
        ], None);
        assert_eq!(
            output.markup,
            "<div className=\"component-a\" id=\"a\">\n  <p className=\"component-b\" id=\"b\">hi</p>\n</div>\n"
        );
        assert!(output.css.is_empty());
    }

    #[test]
    fn test_inline_and_tree_children_are_unioned() {
        let parent = ComponentNode::new("list", "ul")
            .with_children(vec![ComponentNode::new("first", "li").with_text("one")]);
        let output = render(&[
            parent,
            ComponentNode::new("second", "li").with_parent("list").with_text("two"),
        ], None);
        let first = output.markup.find("one").unwrap();
        let second = output.markup.find("two").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_self_closing_only_without_content() {
        let output = render(&[ComponentNode::new("x", "div")], None);
        assert_eq!(output.markup, "<div className=\"component-x\" id=\"x\" />\n");

        let output = render(&[ComponentNode::new("field", "input").with_text("ignored")], None);
        assert_eq!(output.markup, "<input className=\"component-field\" id=\"field\" />\n");
    }

    #[test]
    fn test_attributes_and_handlers() {
        let node = ComponentNode::new("cta btn", "button")
            .with_prop("className", "primary")
            .with_prop("disabled", true)
            .with_prop("tabIndex", 2)
            .with_prop("onClick", "#alert('hi')")
            .with_prop("onChange", "(e) => setValue(e.target.value)")
            .with_text("Go");
        let output = render(&[node], None);
        assert_eq!(
            output.markup,
            "<button className=\"component-cta-btn primary\" id=\"cta-btn\" disabled tabIndex={2} \
             onChange={(e) => setValue(e.target.value)} onClick={() => { alert('hi') }}>Go</button>\n"
        );
    }

    #[test]
    fn test_html_id_prop_is_sanitized() {
        let output = render(&[ComponentNode::new("n1", "div").with_prop("id", "hero banner")], None);
        assert_eq!(output.markup, "<div className=\"component-n1\" id=\"hero-banner\" />\n");

        let output = render(&[ComponentNode::new("n2", "div").with_prop("id", "main_nav.top")], None);
        assert!(output.markup.contains("id=\"main-nav-top\""));
        assert!(output.markup.contains("className=\"component-n2\""));

        let output = render(&[ComponentNode::new("n3", "div").with_prop("id", "  ")], None);
        assert!(output.markup.contains("id=\"n3\""));
    }

    #[test]
    fn test_render_for_page() {
        let nodes = vec![
            ComponentNode::new("home", "div").with_prop("pageId", "p1"),
            ComponentNode::new("about", "div").with_prop("pageId", "p2"),
            ComponentNode::new("shared", "div"),
        ];
        let page = Page::new("p2", "About");

        let output = render(&nodes, Some(&page));
        assert!(output.markup.contains("id=\"about\""));
        assert!(output.markup.contains("id=\"shared\""));
        assert!(!output.markup.contains("id=\"home\""));

        assert!(render(&nodes, None).markup.contains("id=\"home\""));
    }

    #[test]
    fn test_handler_expression() {
        assert_eq!(handler_expression("  ").as_deref(), None);
        assert_eq!(handler_expression("#").as_deref(), None);
        assert_eq!(
            handler_expression("doThing()").as_deref(),
            Some("() => { doThing() }")
        );
        assert_eq!(handler_expression("e => go(e)").as_deref(), Some("e => go(e)"));
        assert_eq!(
            handler_expression("#() => save()").as_deref(),
            Some("() => save()")
        );
        assert_eq!(
            handler_expression("function () { go() }").as_deref(),
            Some("function () { go() }")
        );
    }

    #[test]
    fn test_detached_nodes_render_as_roots() {
        let output = render(&[
            ComponentNode::new("a", "div"),
            ComponentNode::new("lost", "span").with_parent("gone").with_text("x"),
        ], None);
        assert!(output.markup.contains("id=\"lost\""));
    }

    #[test]
    fn test_css_covers_unreachable_nodes() {
        let nodes = vec![
            ComponentNode::new("root", "div").with_style("color", "red"),
            ComponentNode::new("x", "div").with_parent("y").with_style("width", "1px"),
            ComponentNode::new("y", "div").with_parent("x").with_style("height", "2px"),
        ];
        let tree = ComponentTree::unchecked(nodes);
        let renderer = JsxRenderer::new(&tree);
        let css = renderer.collect_css();
        assert!(css.contains(".component-root {"));
        assert!(css.contains(".component-x {"));
        assert_eq!(css.matches(".component-y {").count(), 1);
        assert!(!renderer.render_markup(0).contains("component-x"));
    }

    #[test]
    fn test_special_text_is_escaped() {
        let output = render(&[ComponentNode::new("t", "p").with_text("a {b} <c>")], None);
        assert!(output.markup.contains(">{\"a {b} <c>\"}</p>"));
    }

    #[test]
    fn test_unknown_type_renders_div() {
        let output = render(&[ComponentNode::new("t", "My Widget!")], None);
        assert!(output.markup.starts_with("<div "));
        let output = render(&[ComponentNode::new("t", "Text").with_text("x")], None);
        assert!(output.markup.starts_with("<span "));
    }
}
