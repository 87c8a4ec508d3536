//! Pseudo-class and pseudo-element requests ("on hover make it red").

use atelier_model::Changes;
use lazy_static::lazy_static;
use regex::Regex;

use super::values::{
    extract_background, extract_height, extract_text_color, extract_width, first_color_word,
    mentions_text,
};
use super::{InterpretContext, Prompt, Rule, RuleGroup};

pub(super) const RULES: &[Rule] = &[Rule::new("pseudo-state", RuleGroup::PseudoState, pseudo_state)];

lazy_static! {
    static ref SELECTORS: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r"\b(?:hover|hovers|hovered|hovering|mouse\s?over|mouseover|cursor\s+(?:is\s+)?over)\b").unwrap(),
            ":hover",
        ),
        (
            Regex::new(r"\b(?:pressed|while\s+clicking|being\s+clicked|active\s+state|when\s+active)\b").unwrap(),
            ":active",
        ),
        (Regex::new(r"\b(?:focus|focused|focuses)\b").unwrap(), ":focus"),
        (Regex::new(r"::?before\b|\bbefore\s+(?:pseudo|element)\b").unwrap(), "::before"),
        (Regex::new(r"::?after\b|\bafter\s+(?:pseudo|element)\b").unwrap(), "::after"),
    ];
}

/// Selector named by the prompt, if any.
pub fn detect_selector(lower: &str) -> Option<&'static str> {
    SELECTORS
        .iter()
        .find(|(re, _)| re.is_match(lower))
        .map(|(_, selector)| *selector)
}

/// Declarations for a pseudo block, in emission order.
pub fn declarations(lower: &str) -> Vec<(&'static str, String)> {
    let mut decls = Vec::new();
    if let Some(width) = extract_width(lower) {
        decls.push(("width", width));
    }
    if let Some(height) = extract_height(lower) {
        decls.push(("height", height));
    }

    let background = extract_background(lower);
    let text = extract_text_color(lower);
    match (background, text) {
        (None, None) => {
            if let Some(color) = first_color_word(lower) {
                if mentions_text(lower) {
                    decls.push(("color", color));
                } else {
                    decls.push(("background-color", color));
                }
            }
        }
        (background, text) => {
            if let Some(color) = background {
                decls.push(("background-color", color));
            }
            if let Some(color) = text {
                decls.push(("color", color));
            }
        }
    }
    decls
}

/// Render `selector { prop: value; }` with one declaration per line.
pub fn format_block(selector: &str, decls: &[(&str, String)]) -> String {
    let mut css = format!("{} {{\n", selector);
    for (prop, value) in decls {
        css.push_str(&format!("  {}: {};\n", prop, value));
    }
    css.push('}');
    css
}

fn pseudo_state(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let Some(selector) = detect_selector(prompt.lower()) else {
        return false;
    };

    // A state request never falls through to plain style rules, even when
    // nothing inside it could be extracted.
    let decls = declarations(prompt.lower());
    if !decls.is_empty() {
        changes.custom_css = Some(format_block(selector, &decls));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_selector() {
        assert_eq!(detect_selector("when the mouse over it"), Some(":hover"));
        assert_eq!(detect_selector("on focus add a border"), Some(":focus"));
        assert_eq!(detect_selector("when pressed go dark"), Some(":active"));
        assert_eq!(detect_selector("add a ::after element"), Some("::after"));
        assert_eq!(detect_selector("make it bigger"), None);
    }

    #[test]
    fn test_block_format() {
        let decls = declarations("on hover width 200px and background green");
        assert_eq!(
            format_block(":hover", &decls),
            ":hover {\n  width: 200px;\n  background-color: #008000;\n}"
        );
    }

    #[test]
    fn test_text_color_inside_pseudo() {
        let decls = declarations("on focus make the text white");
        assert_eq!(decls, vec![("color", "#ffffff".to_string())]);
    }

    #[test]
    fn test_empty_declarations_still_short_circuit() {
        let mut changes = Changes::default();
        let fired = pseudo_state(
            &Prompt::new("when hovering do something nice"),
            &InterpretContext::default(),
            &mut changes,
        );
        assert!(fired);
        assert!(changes.is_empty());
    }
}
