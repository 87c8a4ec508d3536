//! The change patch produced by every interpretation path.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::node::ComponentNode;

/// camelCase style key to scalar CSS value.
pub type StyleMap = BTreeMap<String, String>;

/// Component props (everything except `style`).
pub type PropMap = BTreeMap<String, Value>;

/// A mutation to a single component node.
///
/// Every field is optional; an all-empty patch means "nothing understood".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changes {
    /// Style entries merged over the node's existing style map
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_style"
    )]
    pub style: StyleMap,
    /// Raw CSS, possibly with bare pseudo-class selectors
    #[serde(rename = "customCSS", default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    /// Replacement tag name
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    /// Prop entries merged over the node's props
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
    /// Wrap the target in a new parent of this tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_in: Option<String>,
    /// Modal subtree inserted as a sibling of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_modal: Option<ComponentNode>,
}

impl Changes {
    /// Patch that only carries style entries.
    pub fn with_style<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            style: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// True when the patch carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.style.is_empty()
            && self.custom_css.as_deref().map_or(true, |css| css.trim().is_empty())
            && self.component_type.is_none()
            && self.props.as_ref().map_or(true, |p| p.is_empty())
            && self.wrap_in.is_none()
            && self.create_modal.is_none()
    }

    /// Whether the patch asks for a structural edit rather than a plain update.
    pub fn is_structural(&self) -> bool {
        self.wrap_in.is_some() || self.create_modal.is_some()
    }

    /// Set a single style entry.
    pub fn set_style(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.style.insert(key.into(), value.into());
    }

    /// Set a single prop entry.
    pub fn set_prop(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props
            .get_or_insert_with(PropMap::new)
            .insert(key.into(), value.into());
    }

    /// Flex alignment keys are meaningless without a flex container, so any
    /// patch carrying `justifyContent` or `alignItems` also gets
    /// `display: flex` unless it already names a display mode.
    pub fn ensure_flex_display(&mut self) {
        let needs_flex =
            self.style.contains_key("justifyContent") || self.style.contains_key("alignItems");
        if needs_flex && !self.style.contains_key("display") {
            self.style.insert("display".to_string(), "flex".to_string());
        }
    }

    /// Merge another patch into this one; entries from `other` win.
    pub fn merge(&mut self, other: Changes) {
        self.style.extend(other.style);
        if other.custom_css.is_some() {
            self.custom_css = other.custom_css;
        }
        if other.component_type.is_some() {
            self.component_type = other.component_type;
        }
        if let Some(props) = other.props {
            self.props.get_or_insert_with(PropMap::new).extend(props);
        }
        if other.wrap_in.is_some() {
            self.wrap_in = other.wrap_in;
        }
        if other.create_modal.is_some() {
            self.create_modal = other.create_modal;
        }
    }
}

/// Render a scalar JSON value as a CSS value string.
pub fn style_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build a style map from a JSON object, keeping scalar values only.
pub fn style_from_value(value: &Value) -> StyleMap {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| style_value_to_string(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default()
}

fn deserialize_style<'de, D>(deserializer: D) -> Result<StyleMap, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(style_from_value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_patch() {
        assert!(Changes::default().is_empty());

        let mut changes = Changes::default();
        changes.custom_css = Some("   ".to_string());
        assert!(changes.is_empty());

        changes.set_prop("disabled", true);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_flex_invariant() {
        let mut changes = Changes::with_style([("justifyContent", "center")]);
        changes.ensure_flex_display();
        assert_eq!(changes.style.get("display").map(String::as_str), Some("flex"));

        let mut grid = Changes::with_style([("alignItems", "center"), ("display", "grid")]);
        grid.ensure_flex_display();
        assert_eq!(grid.style.get("display").map(String::as_str), Some("grid"));

        let mut plain = Changes::with_style([("color", "#ff0000")]);
        plain.ensure_flex_display();
        assert!(!plain.style.contains_key("display"));
    }

    #[test]
    fn test_wire_names() {
        let changes: Changes = serde_json::from_value(json!({
            "style": {"opacity": 0.5, "fontWeight": 700, "color": "red", "nested": {"x": 1}},
            "customCSS": ":hover { color: red; }",
            "type": "button",
            "wrap_in": "section"
        }))
        .unwrap();

        assert_eq!(changes.style.get("opacity").map(String::as_str), Some("0.5"));
        assert_eq!(changes.style.get("fontWeight").map(String::as_str), Some("700"));
        assert!(!changes.style.contains_key("nested"));
        assert_eq!(changes.component_type.as_deref(), Some("button"));
        assert_eq!(changes.wrap_in.as_deref(), Some("section"));

        let out = serde_json::to_value(&changes).unwrap();
        assert_eq!(out["customCSS"], ":hover { color: red; }");
        assert!(out.get("props").is_none());
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base = Changes::with_style([("color", "#000000"), ("width", "10px")]);
        base.merge(Changes::with_style([("color", "#ffffff")]));
        assert_eq!(base.style.get("color").map(String::as_str), Some("#ffffff"));
        assert_eq!(base.style.get("width").map(String::as_str), Some("10px"));
    }
}
