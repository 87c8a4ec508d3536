//! Content and HTML attribute probes. All of them are additive into `props`.

use atelier_model::{normalize_color, Changes};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::{InterpretContext, Prompt, Rule, RuleGroup};

pub(super) const RULES: &[Rule] = &[
    Rule::new("text", RuleGroup::Content, text),
    Rule::new("placeholder", RuleGroup::Content, placeholder),
    Rule::new("href", RuleGroup::Content, href),
    Rule::new("src", RuleGroup::Content, src),
    Rule::new("alt", RuleGroup::Content, alt),
    Rule::new("class-name", RuleGroup::Content, class_name),
    Rule::new("html-id", RuleGroup::Content, html_id),
    Rule::new("input-type", RuleGroup::Content, input_type),
    Rule::new("disabled", RuleGroup::Content, disabled),
    Rule::new("required", RuleGroup::Content, required),
];

const QUOTED: &str = r#"["'“‘]([^"'”’]+)["'”’]"#;

lazy_static! {
    static ref TEXT_QUOTED: Vec<Regex> = vec![
        Regex::new(&format!(
            r"(?i)\b(?:change|set|update|make)\s+(?:the\s+)?(?:\w+\s+)?(?:text|label|content|title|caption|heading|wording)\s+(?:to|=|:|as|into)\s*{}",
            QUOTED
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)\b(?:text|label|content|caption|wording)\s+(?:to|should\s+be|=|:|is|says?)\s*{}",
            QUOTED
        ))
        .unwrap(),
        Regex::new(&format!(r"(?i)\b(?:say|says|saying|read|reads|display|displays|show|shows)\s+{}", QUOTED)).unwrap(),
    ];
    static ref TEXT_UNQUOTED: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(?:change|set|update)\s+(?:the\s+)?(?:\w+\s+)?(?:text|label|content|title|caption|heading|wording)\s+to\s+(.+?)\s*$").unwrap(),
        Regex::new(r"(?i)\b(?:say|says|read|reads)\s+(.+?)\s*$").unwrap(),
    ];
    static ref PLACEHOLDER_QUOTED: Regex = Regex::new(&format!(
        r"(?i)\bplaceholder\s*(?:text\s*)?(?:to|=|:|as|of|is|says?)?\s*{}",
        QUOTED
    ))
    .unwrap();
    static ref PLACEHOLDER_UNQUOTED: Regex =
        Regex::new(r"(?i)\bplaceholder\s*(?:text\s*)?(?:to|=|:|as)\s+(.+?)\s*$").unwrap();
    static ref HREF: Regex = Regex::new(
        r#"(?i)\b(?:link\s+(?:it\s+)?to|href\s*(?:to|=|:)?|points?\s+to|navigate\s+to|go\s+to|url\s*(?:to|=|:)?)\s*["']?((?:https?://|mailto:|tel:|/|#|www\.)[^\s"']*|[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}(?:/[^\s"']*)?)"#
    )
    .unwrap();
    static ref SRC: Regex = Regex::new(
        r#"(?i)\b(?:src|source|image\s+(?:url|source)|image|picture|photo)\s*(?:to|=|:|as|from)?\s*["']?((?:https?://|/|\./|data:)[^\s"']+)"#
    )
    .unwrap();
    static ref ALT: Regex =
        Regex::new(&format!(r"(?i)\balt(?:\s+text)?\s*(?:to|=|:|as|of)?\s*{}", QUOTED)).unwrap();
    static ref ALT_WORD: Regex = Regex::new(r"(?i)\balt\b").unwrap();
    static ref CLASS_NAME: Regex = Regex::new(
        r#"(?i)\b(?:class\s*name|classname|css\s+class|class)\s*(?:to|=|:|of|as)?\s*["']?([a-z_][\w-]*)"#
    )
    .unwrap();
    static ref HTML_ID: Regex =
        Regex::new(r#"(?i)\b(?:html\s+)?id\b\s*(?:to|=|:|as|of)?\s*["']?([a-z][\w-]*)"#).unwrap();
    static ref INPUT_TYPE: Regex = Regex::new(
        r#"\b(?:input\s+)?type\s*(?:to|=|:|as|of)?\s*["']?(text|email|password|number|tel|date|checkbox|radio|file|url|search|color|range|time)\b"#
    )
    .unwrap();
    static ref INPUT_TYPE_BEFORE: Regex = Regex::new(
        r"\b(email|password|number|date|checkbox|radio|file|search|phone|telephone)\s+(?:input|field|box)\b"
    )
    .unwrap();
    static ref MENTIONS_INPUT: Regex = Regex::new(r"\b(?:input|field|textbox)\b").unwrap();
    static ref DISABLE: Regex = Regex::new(
        r"\b(?:disable|disabled|not\s+clickable|unclickable|gr[ae]y(?:ed)?\s+out|inactive)\b"
    )
    .unwrap();
    static ref ENABLE: Regex = Regex::new(r"\b(?:enable|enabled|clickable|re-?enable)\b").unwrap();
    static ref NOT_REQUIRED: Regex = Regex::new(r"\b(?:not\s+required|optional|not\s+mandatory)\b").unwrap();
    static ref REQUIRED: Regex = Regex::new(r"\b(?:required|mandatory|compulsory)\b").unwrap();
}

/// Words that follow "id"/"class" in ordinary sentences.
const ATTRIBUTE_STOPWORDS: &[&str] = &[
    "to", "the", "a", "an", "it", "this", "that", "is", "of", "and", "name", "attribute", "for",
];

fn first_capture<'a>(patterns: &[Regex], text: &'a str) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str()))
}

/// Text content requested by the prompt, case preserved.
pub fn extract_text(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    if lower.contains("placeholder") || ALT_WORD.is_match(&lower) {
        return None;
    }

    let value = first_capture(&TEXT_QUOTED, raw)
        .or_else(|| first_capture(&TEXT_UNQUOTED, raw))?
        .trim();
    let value = value.trim_end_matches(['.', '!']).trim();
    if value.is_empty() || normalize_color(value).is_some() {
        return None;
    }
    Some(value.to_string())
}

fn text(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match extract_text(prompt.raw()) {
        Some(value) => {
            changes.set_prop("children", value);
            true
        }
        None => false,
    }
}

fn placeholder(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let value = PLACEHOLDER_QUOTED
        .captures(prompt.raw())
        .or_else(|| PLACEHOLDER_UNQUOTED.captures(prompt.raw()))
        .map(|caps| caps[1].trim().to_string());
    match value {
        Some(value) if !value.is_empty() => {
            changes.set_prop("placeholder", value);
            true
        }
        _ => false,
    }
}

/// Normalize a link target; bare domains get `https://`.
pub fn normalize_href(target: &str) -> String {
    let target = target.trim_end_matches(['.', ',', '!']);
    let lower = target.to_lowercase();
    if ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|p| lower.starts_with(p))
    {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

fn href(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match HREF.captures(prompt.raw()) {
        Some(caps) if !caps[1].is_empty() => {
            changes.set_prop("href", normalize_href(&caps[1]));
            true
        }
        _ => false,
    }
}

fn src(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match SRC.captures(prompt.raw()) {
        Some(caps) => {
            changes.set_prop("src", caps[1].to_string());
            true
        }
        None => false,
    }
}

fn alt(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match ALT.captures(prompt.raw()) {
        Some(caps) => {
            changes.set_prop("alt", caps[1].trim().to_string());
            true
        }
        None => false,
    }
}

fn attribute_value<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .find(|value| !ATTRIBUTE_STOPWORDS.contains(&value.to_lowercase().as_str()))
}

fn class_name(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match attribute_value(&CLASS_NAME, prompt.raw()) {
        Some(value) => {
            changes.set_prop("className", value);
            true
        }
        None => false,
    }
}

fn html_id(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match attribute_value(&HTML_ID, prompt.raw()) {
        Some(value) => {
            changes.set_prop("id", value);
            true
        }
        None => false,
    }
}

fn input_type(prompt: &Prompt, ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let is_input = matches!(ctx.component_type, Some("input")) || MENTIONS_INPUT.is_match(lower);
    if !is_input {
        return false;
    }

    let value = INPUT_TYPE
        .captures(lower)
        .or_else(|| INPUT_TYPE_BEFORE.captures(lower))
        .map(|caps| match &caps[1] {
            "phone" | "telephone" => "tel".to_string(),
            other => other.to_string(),
        });
    match value {
        Some(value) => {
            changes.set_prop("type", value);
            true
        }
        None => false,
    }
}

fn disabled(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let value = if DISABLE.is_match(prompt.lower()) {
        true
    } else if ENABLE.is_match(prompt.lower()) {
        false
    } else {
        return false;
    };
    changes.set_prop("disabled", Value::Bool(value));
    true
}

fn required(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let value = if NOT_REQUIRED.is_match(prompt.lower()) {
        false
    } else if REQUIRED.is_match(prompt.lower()) {
        true
    } else {
        return false;
    };
    changes.set_prop("required", Value::Bool(value));
    true
}
