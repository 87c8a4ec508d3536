//! Component nodes and pages as supplied by the project store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::changes::{style_from_value, PropMap, StyleMap};

/// One element of the visual tree.
///
/// Tree edges are expressed through `parent_id`; a node may additionally
/// carry inline children in `props.children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Stable id, unique within a project
    pub id: String,
    /// HTML-like tag name
    #[serde(rename = "type", default = "default_component_type")]
    pub component_type: String,
    /// Parent node id; `None` for roots
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Props, including the nested `style` map
    #[serde(default)]
    pub props: PropMap,
}

fn default_component_type() -> String {
    "div".to_string()
}

/// Inline content carried in `props.children`.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineChildren {
    None,
    Text(String),
    Items(Vec<InlineChild>),
}

/// A single entry of an inline children list.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineChild {
    Text(String),
    Node(ComponentNode),
}

impl InlineChildren {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(text) => text.is_empty(),
            Self::Items(items) => items.is_empty(),
        }
    }
}

impl ComponentNode {
    /// Create a root node with no props.
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            parent_id: None,
            props: PropMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = StyleMap::new();
        entries.insert(key.into(), value.into());
        self.merge_style(&entries);
        self
    }

    /// Set inline text content.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_prop("children", Value::String(text.into()))
    }

    /// Set inline child nodes.
    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        let items = children
            .into_iter()
            .filter_map(|child| serde_json::to_value(child).ok())
            .collect();
        self.props.insert("children".to_string(), Value::Array(items));
        self
    }

    /// The node's style map (scalar entries only).
    pub fn style(&self) -> StyleMap {
        self.props
            .get("style")
            .map(style_from_value)
            .unwrap_or_default()
    }

    /// Merge style entries over the existing style map.
    pub fn merge_style(&mut self, entries: &StyleMap) {
        if entries.is_empty() {
            return;
        }
        let slot = self
            .props
            .entry("style".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            for (key, value) in entries {
                map.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }

    /// Raw custom CSS attached to this node.
    pub fn custom_css(&self) -> Option<&str> {
        self.prop_str("customCSS").filter(|css| !css.trim().is_empty())
    }

    /// Page assignment, if any.
    pub fn page_id(&self) -> Option<&str> {
        self.prop_str("pageId").filter(|id| !id.is_empty())
    }

    /// String prop accessor.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Parse `props.children` into inline content.
    pub fn inline_children(&self) -> InlineChildren {
        match self.props.get("children") {
            Some(Value::String(text)) => InlineChildren::Text(text.clone()),
            Some(Value::Number(n)) => InlineChildren::Text(n.to_string()),
            Some(Value::Array(items)) => InlineChildren::Items(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(InlineChild::Text(text.clone())),
                        Value::Number(n) => Some(InlineChild::Text(n.to_string())),
                        Value::Object(_) => {
                            match serde_json::from_value::<ComponentNode>(item.clone()) {
                                Ok(node) => Some(InlineChild::Node(node)),
                                Err(e) => {
                                    warn!("Skipping malformed inline child of {}: {}", self.id, e);
                                    None
                                }
                            }
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            _ => InlineChildren::None,
        }
    }
}

/// A named, routable grouping of component nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable id used as the file-identity key
    pub id: String,
    /// Display name; drives the generated file name
    pub name: String,
    /// URL path; defaults to a slug of the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            route: None,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Effective route, always starting with `/`.
    pub fn route(&self) -> String {
        match self.route.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(route) if route.starts_with('/') => route.to_string(),
            Some(route) => format!("/{}", route),
            None => format!("/{}", slugify(&self.name)),
        }
    }
}

/// Convert a string to a URL-safe slug.
pub fn slugify(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
