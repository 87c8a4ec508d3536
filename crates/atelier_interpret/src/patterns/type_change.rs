//! Tag replacement ("turn it into a link").

use atelier_model::Changes;
use lazy_static::lazy_static;
use regex::Regex;

use super::structural::has_wrap_vocabulary;
use super::{InterpretContext, Prompt, Rule, RuleGroup};

pub(super) const RULES: &[Rule] = &[Rule::new("type-change", RuleGroup::TypeChange, type_change)];

/// Ordered `tag -> synonyms`; earlier entries win, so multi-word synonyms
/// that share a prefix with later ones come first.
pub const TYPE_SYNONYMS: &[(&str, &[&str])] = &[
    ("textarea", &["textarea", "text area", "multiline input", "multi-line input"]),
    ("input", &["input field", "text field", "text input", "textbox", "text box", "input", "field"]),
    ("button", &["button", "btn"]),
    ("select", &["dropdown", "drop-down", "select"]),
    ("img", &["image", "picture", "photo", "img"]),
    ("a", &["hyperlink", "anchor", "link"]),
    ("h1", &["main heading", "heading", "headline", "title", "h1"]),
    ("h2", &["subheading", "sub heading", "subtitle", "h2"]),
    ("h3", &["h3"]),
    ("p", &["paragraph", "text", "p"]),
    ("span", &["span", "inline text"]),
    ("label", &["label"]),
    ("ul", &["bulleted list", "unordered list", "list", "ul"]),
    ("ol", &["numbered list", "ordered list", "ol"]),
    ("nav", &["navigation bar", "navigation", "navbar", "nav"]),
    ("header", &["header"]),
    ("footer", &["footer"]),
    ("section", &["section"]),
    ("article", &["article"]),
    ("form", &["form"]),
    ("div", &["container", "box", "div"]),
];

lazy_static! {
    static ref EXPLICIT: Vec<Regex> = vec![
        Regex::new(r"\b(?:change|convert|turn|transform|switch)\s+(?:it|this|the\s+\w+)?\s*(?:in)?to\s+(?:an?\s+)?(.+?)\s*[.!]?$").unwrap(),
        Regex::new(r"\bmake\s+(?:it|this)\s+an?\s+(.+?)\s*[.!]?$").unwrap(),
        Regex::new(r"\breplace\s+(?:it|this)\s+with\s+(?:an?\s+)?(.+?)\s*[.!]?$").unwrap(),
        Regex::new(r"\bshould\s+be\s+an?\s+(.+?)\s*[.!]?$").unwrap(),
    ];
    static ref STANDALONE: Regex =
        Regex::new(r"^(?:it\s+should\s+be\s+|as\s+|be\s+)?(?:a\s+|an\s+)?(.+?)\s*[.!]?$").unwrap();
}

/// Resolve a phrase that starts with a tag synonym.
pub fn resolve_type(phrase: &str) -> Option<&'static str> {
    let phrase = phrase.trim();
    TYPE_SYNONYMS.iter().find_map(|(tag, synonyms)| {
        synonyms
            .iter()
            .any(|syn| {
                phrase == *syn
                    || phrase
                        .strip_prefix(syn)
                        .map_or(false, |rest| rest.starts_with(' '))
            })
            .then_some(*tag)
    })
}

/// Exact synonym match for a whole phrase.
fn resolve_exact(phrase: &str) -> Option<&'static str> {
    let phrase = phrase.trim();
    TYPE_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&phrase))
        .map(|(tag, _)| *tag)
}

/// Target tag of a type-change request.
pub fn detect_type(lower: &str) -> Option<&'static str> {
    let explicit = EXPLICIT.iter().find_map(|re| {
        re.captures(lower)
            .and_then(|caps| resolve_type(&caps[1]))
    });
    if explicit.is_some() {
        return explicit;
    }

    if has_wrap_vocabulary(lower) {
        return None;
    }
    STANDALONE
        .captures(lower.trim())
        .and_then(|caps| resolve_exact(&caps[1]))
}

fn type_change(prompt: &Prompt, ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let Some(tag) = detect_type(prompt.lower()) else {
        return false;
    };
    if ctx.component_type == Some(tag) {
        return false;
    }
    changes.component_type = Some(tag.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_change() {
        assert_eq!(detect_type("turn it into a link"), Some("a"));
        assert_eq!(detect_type("change this to a text field"), Some("input"));
        assert_eq!(detect_type("make it a button"), Some("button"));
        assert_eq!(detect_type("replace it with an image"), Some("img"));
        assert_eq!(detect_type("convert the box to a dropdown please"), Some("select"));
    }

    #[test]
    fn test_standalone_word() {
        assert_eq!(detect_type("a heading"), Some("h1"));
        assert_eq!(detect_type("paragraph"), Some("p"));
        assert_eq!(detect_type("it should be a textarea"), Some("textarea"));
    }

    #[test]
    fn test_not_a_type_change() {
        assert_eq!(detect_type("change width to 500px"), None);
        assert_eq!(detect_type("change the color to red"), None);
        assert_eq!(detect_type("section around it"), None);
        assert_eq!(detect_type("make the text bigger"), None);
    }

    #[test]
    fn test_same_type_is_ignored() {
        let mut changes = Changes::default();
        let ctx = InterpretContext {
            component_type: Some("button"),
            ..Default::default()
        };
        assert!(!type_change(&Prompt::new("make it a button"), &ctx, &mut changes));
        assert!(changes.component_type.is_none());
    }
}
