//! Per-component CSS rules and custom CSS scoping.

use atelier_model::{camel_to_kebab, ComponentNode, StyleMap};
use lazy_static::lazy_static;
use regex::Regex;

use crate::naming::component_class;

lazy_static! {
    static ref BARE_PSEUDO: Regex = Regex::new(
        r"(?m)^([ \t]*)(::?(?:hover|active|focus|before|after|first-child|last-child|nth-child\([^)]*\)))"
    )
    .unwrap();
}

/// Render `style` as one rule under `.class`. Empty styles yield nothing.
pub fn style_rule(class: &str, style: &StyleMap) -> Option<String> {
    if style.is_empty() {
        return None;
    }
    let mut rule = format!(".{} {{\n", class);
    for (key, value) in style {
        rule.push_str(&format!("  {}: {};\n", camel_to_kebab(key), value));
    }
    rule.push_str("}\n");
    Some(rule)
}

/// Scope author CSS to `class`.
///
/// Bare pseudo selectors at the start of a line are prefixed with the class.
/// If the class still does not appear anywhere, the whole block is nested
/// under it so nothing applies globally.
pub fn scope_custom_css(class: &str, css: &str) -> String {
    let selector = format!(".{}", class);
    let scoped = BARE_PSEUDO
        .replace_all(css.trim(), |caps: &regex::Captures| {
            format!("{}{}{}", &caps[1], selector, &caps[2])
        })
        .to_string();

    if scoped.contains(&selector) {
        return format!("{}\n", scoped);
    }

    let mut wrapped = format!("{} {{\n", selector);
    for line in scoped.lines() {
        if line.trim().is_empty() {
            wrapped.push('\n');
        } else {
            wrapped.push_str("  ");
            wrapped.push_str(line);
            wrapped.push('\n');
        }
    }
    wrapped.push_str("}\n");
    wrapped
}

/// All CSS contributed by one node: its style rule, then its custom CSS.
pub fn node_css(node: &ComponentNode) -> String {
    let class = component_class(&node.id);
    let mut css = style_rule(&class, &node.style()).unwrap_or_default();
    if let Some(custom) = node.custom_css() {
        if !css.is_empty() {
            css.push('\n');
        }
        css.push_str(&scope_custom_css(&class, custom));
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_rule() {
        let mut style = StyleMap::new();
        style.insert("backgroundColor".to_string(), "#0000ff".to_string());
        style.insert("padding".to_string(), "16px".to_string());
        assert_eq!(
            style_rule("component-a", &style).unwrap(),
            ".component-a {\n  background-color: #0000ff;\n  padding: 16px;\n}\n"
        );
        assert!(style_rule("component-a", &StyleMap::new()).is_none());
    }

    #[test]
    fn test_bare_pseudo_is_prefixed() {
        let css = ":hover {\n  width: 500px;\n}\n::after {\n  content: '';\n}";
        let scoped = scope_custom_css("component-x", css);
        assert_eq!(
            scoped,
            ".component-x:hover {\n  width: 500px;\n}\n.component-x::after {\n  content: '';\n}\n"
        );
        assert!(!scoped.lines().any(|l| l.starts_with(':')));
    }

    #[test]
    fn test_nth_child_is_prefixed() {
        let scoped = scope_custom_css("component-li", ":nth-child(2n+1) { color: red; }");
        assert!(scoped.starts_with(".component-li:nth-child(2n+1) {"));
    }

    #[test]
    fn test_unscoped_declarations_are_wrapped() {
        let scoped = scope_custom_css("component-x", "color: red;\nfont-weight: bold;");
        assert_eq!(
            scoped,
            ".component-x {\n  color: red;\n  font-weight: bold;\n}\n"
        );
    }

    #[test]
    fn test_already_scoped_css_untouched() {
        let css = ".component-x span { color: red; }";
        assert_eq!(scope_custom_css("component-x", css), format!("{}\n", css));
    }

    #[test]
    fn test_styleless_node_has_no_css() {
        assert!(node_css(&ComponentNode::new("a", "div")).is_empty());
        let styled = ComponentNode::new("a", "div").with_style("color", "red");
        assert_eq!(node_css(&styled), ".component-a {\n  color: red;\n}\n");
    }
}
