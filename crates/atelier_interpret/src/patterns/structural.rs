//! Structural edits: wrapping a node in a new parent and synthesizing modals.

use atelier_model::{Changes, ComponentNode};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use super::{InterpretContext, Prompt, Rule, RuleGroup};

pub(super) const RULES: &[Rule] = &[
    Rule::new("wrap", RuleGroup::Structural, wrap),
    Rule::new("modal", RuleGroup::Structural, modal),
];

lazy_static! {
    static ref WRAP_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bwrap(?:\s+(?:it|this|me|them|the\s+\w+))?\s+(?:in|with|inside|into)\s+(?:(?:an?|the)\s+)?(\w+)").unwrap(),
        Regex::new(r"\b(?:put|place|add)\s+(?:(?:an?|the)\s+)?(\w+)\s+around\b").unwrap(),
        Regex::new(r"\bput\s+(?:it|this|them)\s+(?:in|inside|into)\s+(?:(?:an?|the)\s+)?(\w+)").unwrap(),
        Regex::new(r"\bsurround\s+(?:it|this|them)?\s*with\s+(?:(?:an?|the)\s+)?(\w+)").unwrap(),
        Regex::new(r"\bgive\s+(?:it|this)\s+an?\s+(?:(\w+)\s+)?parent\b").unwrap(),
    ];
    static ref WRAP_VOCABULARY: Regex =
        Regex::new(r"\b(?:wrap|wrapped|wrapping|around|surround|surrounded|parent|enclose)\b").unwrap();
    static ref MODAL_VOCABULARY: Regex = Regex::new(r"\b(?:modal|dialog|popup|pop-up|lightbox)\b").unwrap();
    static ref MODAL_VERB: Regex = Regex::new(
        r"\b(?:add|create|show|open|opens|display|displays|build|insert|launch|launches|trigger|triggers|pop|pops|click|clicked)\b"
    )
    .unwrap();
    static ref MODAL_TITLE: Regex = Regex::new(r#"(?i)\btitled\s+["']?([\w ]+?)["']?(?:\s+with\b|$)"#).unwrap();
}

/// Tags a wrapper may become.
const WRAPPER_TAGS: &[&str] = &[
    "div", "section", "article", "header", "footer", "main", "nav", "aside", "form", "span", "ul",
    "li", "label", "fieldset",
];

/// Words that mean "a generic container".
const CONTAINER_WORDS: &[&str] = &["box", "card", "container", "wrapper", "group", "panel", "block"];

/// `(keyword, field key, label, input type)`
const MODAL_FIELDS: &[(&str, &str, &str, &str)] = &[
    ("name", "name", "Name", "text"),
    ("username", "username", "Username", "text"),
    ("email", "email", "Email", "email"),
    ("phone", "phone", "Phone", "tel"),
    ("password", "password", "Password", "password"),
    ("address", "address", "Address", "text"),
    ("message", "message", "Message", "textarea"),
    ("date", "date", "Date", "date"),
    ("age", "age", "Age", "number"),
];

/// Whether the prompt uses wrap/parent vocabulary at all.
pub fn has_wrap_vocabulary(lower: &str) -> bool {
    WRAP_VOCABULARY.is_match(lower)
}

fn wrapper_tag(word: Option<&str>) -> String {
    match word {
        Some(w) if WRAPPER_TAGS.contains(&w) => w.to_string(),
        _ => "div".to_string(),
    }
}

/// Wrapper tag requested by the prompt.
pub fn detect_wrap(lower: &str) -> Option<String> {
    WRAP_PATTERNS.iter().find_map(|re| {
        re.captures(lower).map(|caps| {
            let word = caps.get(1).map(|m| m.as_str());
            match word {
                Some(w) if CONTAINER_WORDS.contains(&w) => "div".to_string(),
                other => wrapper_tag(other),
            }
        })
    })
}

fn wrap(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match detect_wrap(prompt.lower()) {
        Some(tag) => {
            changes.wrap_in = Some(tag);
            true
        }
        None => false,
    }
}

/// Form fields named in a modal request, in table order.
pub fn modal_fields(lower: &str) -> Vec<(&'static str, &'static str, &'static str)> {
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let fields: Vec<_> = MODAL_FIELDS
        .iter()
        .filter(|(keyword, ..)| words.iter().any(|w| w == keyword || *w == format!("{}s", keyword)))
        .map(|(_, key, label, input)| (*key, *label, *input))
        .collect();

    if fields.is_empty() {
        vec![("name", "Name", "text"), ("email", "Email", "email")]
    } else {
        fields
    }
}

/// Build the modal subtree: overlay > content > header, form rows, actions.
pub fn build_modal(modal_id: &str, title: &str, fields: &[(&str, &str, &str)]) -> ComponentNode {
    let close_script = format!(
        "document.getElementById('{}').style.display = 'none'",
        modal_id
    );

    let header = ComponentNode::new(format!("{}-header", modal_id), "div")
        .with_style("display", "flex")
        .with_style("justifyContent", "space-between")
        .with_style("alignItems", "center")
        .with_style("marginBottom", "16px")
        .with_children(vec![
            ComponentNode::new(format!("{}-title", modal_id), "h2")
                .with_style("margin", "0")
                .with_text(title),
            ComponentNode::new(format!("{}-close", modal_id), "button")
                .with_style("background", "none")
                .with_style("border", "none")
                .with_style("fontSize", "24px")
                .with_style("cursor", "pointer")
                .with_prop("onClick", close_script.clone())
                .with_text("\u{00d7}"),
        ]);

    let mut rows: Vec<ComponentNode> = fields
        .iter()
        .map(|(key, label, input_type)| {
            let input_id = format!("{}-input-{}", modal_id, key);
            let input = (if *input_type == "textarea" {
                ComponentNode::new(input_id.clone(), "textarea").with_prop("rows", 4)
            } else {
                ComponentNode::new(input_id.clone(), "input").with_prop("type", *input_type)
            })
            .with_prop("name", *key)
            .with_prop("placeholder", format!("Enter your {}", key))
            .with_style("width", "100%")
            .with_style("padding", "8px")
            .with_style("border", "1px solid #cccccc")
            .with_style("borderRadius", "4px");

            ComponentNode::new(format!("{}-field-{}", modal_id, key), "div")
                .with_style("marginBottom", "12px")
                .with_children(vec![
                    ComponentNode::new(format!("{}-label-{}", modal_id, key), "label")
                        .with_prop("htmlFor", input_id)
                        .with_style("display", "block")
                        .with_style("marginBottom", "4px")
                        .with_text(*label),
                    input,
                ])
        })
        .collect();

    rows.push(
        ComponentNode::new(format!("{}-actions", modal_id), "div")
            .with_style("display", "flex")
            .with_style("justifyContent", "flex-end")
            .with_style("gap", "8px")
            .with_children(vec![
                ComponentNode::new(format!("{}-cancel", modal_id), "button")
                    .with_prop("type", "button")
                    .with_prop("onClick", close_script.clone())
                    .with_style("padding", "8px 16px")
                    .with_text("Cancel"),
                ComponentNode::new(format!("{}-submit", modal_id), "button")
                    .with_prop("type", "submit")
                    .with_style("padding", "8px 16px")
                    .with_style("backgroundColor", "#007bff")
                    .with_style("color", "#ffffff")
                    .with_style("border", "none")
                    .with_style("borderRadius", "4px")
                    .with_text("Submit"),
            ]),
    );

    let form = ComponentNode::new(format!("{}-form", modal_id), "form")
        .with_prop(
            "onSubmit",
            format!("(e) => {{ e.preventDefault(); {}; }}", close_script),
        )
        .with_children(rows);

    let content = ComponentNode::new(format!("{}-content", modal_id), "div")
        .with_style("backgroundColor", "#ffffff")
        .with_style("padding", "24px")
        .with_style("borderRadius", "8px")
        .with_style("width", "400px")
        .with_style("maxWidth", "90%")
        .with_style("boxShadow", "0 4px 12px rgba(0, 0, 0, 0.15)")
        .with_children(vec![header, form]);

    ComponentNode::new(modal_id, "div")
        .with_style("position", "fixed")
        .with_style("top", "0")
        .with_style("left", "0")
        .with_style("width", "100%")
        .with_style("height", "100%")
        .with_style("backgroundColor", "rgba(0, 0, 0, 0.5)")
        .with_style("display", "none")
        .with_style("justifyContent", "center")
        .with_style("alignItems", "center")
        .with_style("zIndex", "1000")
        .with_children(vec![content])
}

fn modal(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    if !MODAL_VOCABULARY.is_match(lower) || !MODAL_VERB.is_match(lower) {
        return false;
    }

    let simple = Uuid::new_v4().simple().to_string();
    let modal_id = format!("modal-{}", &simple[..8]);
    let title = MODAL_TITLE
        .captures(prompt.raw())
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Form".to_string());

    let node = build_modal(&modal_id, &title, &modal_fields(lower));
    changes.set_prop(
        "onClick",
        format!(
            "document.getElementById('{}').style.display = 'flex'",
            modal_id
        ),
    );
    changes.create_modal = Some(node);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_model::{InlineChild, InlineChildren};

    #[test]
    fn test_detect_wrap() {
        assert_eq!(detect_wrap("put a section around this").as_deref(), Some("section"));
        assert_eq!(detect_wrap("wrap it in a card").as_deref(), Some("div"));
        assert_eq!(detect_wrap("wrap this with a header").as_deref(), Some("header"));
        assert_eq!(detect_wrap("give it a parent").as_deref(), Some("div"));
        assert_eq!(detect_wrap("make it a section"), None);
    }

    #[test]
    fn test_modal_fields() {
        let fields = modal_fields("show a modal with name and email and phone");
        let keys: Vec<&str> = fields.iter().map(|(k, ..)| *k).collect();
        assert_eq!(keys, vec!["name", "email", "phone"]);

        let fields = modal_fields("open a dialog asking for a username");
        assert_eq!(fields[0].0, "username");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_modal_subtree_shape() {
        let mut changes = Changes::default();
        let fired = modal(
            &Prompt::new("show a modal with name and email"),
            &InterpretContext::default(),
            &mut changes,
        );
        assert!(fired);

        let node = changes.create_modal.expect("modal");
        assert!(node.id.starts_with("modal-"));
        assert_eq!(node.style().get("display").map(String::as_str), Some("none"));

        let on_click = changes.props.as_ref().unwrap()["onClick"].as_str().unwrap().to_string();
        assert!(on_click.contains(&node.id));
        assert!(on_click.ends_with("'flex'"));

        let InlineChildren::Items(items) = node.inline_children() else {
            panic!("overlay has no content");
        };
        let InlineChild::Node(content) = &items[0] else {
            panic!("content is not a node");
        };
        let InlineChildren::Items(parts) = content.inline_children() else {
            panic!("content has no parts");
        };
        assert_eq!(parts.len(), 2);
        let InlineChild::Node(form) = &parts[1] else {
            panic!("form is not a node");
        };
        assert_eq!(form.component_type, "form");
        let InlineChildren::Items(rows) = form.inline_children() else {
            panic!("form has no rows");
        };
        // name, email, actions
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_modal_needs_verb() {
        let mut changes = Changes::default();
        assert!(!modal(
            &Prompt::new("the modal"),
            &InterpretContext::default(),
            &mut changes
        ));
    }
}
