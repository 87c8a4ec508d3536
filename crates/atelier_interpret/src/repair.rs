//! Tolerant parsing of generative model output.
//!
//! Models wrap JSON in markdown fences, add prose around it, use single
//! quotes and leave trailing commas. The pipeline is deliberately short:
//!
//! 1. strip code fences
//! 2. strict parse of the whole text
//! 3. strict parse of the outermost `{...}` block
//! 4. one normalization pass (quotes, trailing commas) and a single retry
//! 5. scrape `key: value` lines for known style properties

use atelier_model::{
    is_known_style_key, kebab_to_camel, style_from_value, Changes, StyleMap,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

lazy_static! {
    static ref FENCE: Regex = Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)```").unwrap();
    static ref TRAILING_COMMA: Regex = Regex::new(r",(\s*[}\]])").unwrap();
    static ref PROPERTY_LINE: Regex = Regex::new(
        r#"(?m)^\s*[-*]?\s*["']?([a-zA-Z][a-zA-Z-]*)["']?\s*:\s*["']?([^"',;\n{}]+?)["']?\s*[,;]?\s*$"#
    )
    .unwrap();
    // A tag name followed only by attributes, so `a < b` and `a<b && c>d` stay code.
    static ref MARKUP_TAG: Regex = Regex::new(
        r#"</?[a-zA-Z][\w.-]*(?:\s+[\w:-]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}))?)*\s*/?>"#
    )
    .unwrap();
    static ref ON_CLICK_ATTR: Regex = Regex::new(r"onClick\s*=\s*\{").unwrap();
    static ref ARROW_START: Regex = Regex::new(r"\((?:[^()]*)\)\s*=>|\b[a-zA-Z_]\w*\s*=>").unwrap();
}

/// Keys that mark a value as a structured patch rather than a flat style map.
const PATCH_KEYS: &[&str] = &["style", "customCSS", "type", "props", "wrap_in", "create_modal"];

/// A handler that does nothing; substituted for anything unsafe.
pub const NOOP_HANDLER: &str = "() => {}";

/// Remove markdown code fences, keeping the fenced content.
pub fn strip_fences(text: &str) -> String {
    match FENCE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.trim().trim_matches('`').trim().to_string(),
    }
}

/// The outermost `{...}` block of `text`.
pub fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Convert quote delimiters to double quotes and drop trailing commas.
///
/// Apostrophes inside words ("don't") are left alone.
pub fn normalize_json(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_double = false;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if i == 0 || chars[i - 1] != '\\' => {
                in_double = !in_double;
                out.push(c);
            }
            '\'' if !in_double => {
                let prev_word = i > 0 && chars[i - 1].is_alphanumeric();
                let next_word = chars.get(i + 1).map_or(false, |n| n.is_alphanumeric());
                if prev_word && next_word {
                    out.push(c);
                } else {
                    out.push('"');
                }
            }
            _ => out.push(c),
        }
    }

    TRAILING_COMMA.replace_all(&out, "$1").into_owned()
}

/// Parse model output into a JSON value, tolerating common mistakes.
pub fn parse_lenient(text: &str) -> Option<Value> {
    let stripped = strip_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(&stripped) {
        return Some(value);
    }

    let candidate = outermost_object(&stripped).unwrap_or(stripped.as_str());
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Some(value);
    }

    match serde_json::from_str::<Value>(&normalize_json(candidate)) {
        Ok(value) => {
            debug!("Parsed model output after normalization");
            Some(value)
        }
        Err(e) => {
            debug!("Model output is not JSON after repair: {}", e);
            None
        }
    }
}

/// Best-effort style map from `key: value` lines of free text.
pub fn scrape_properties(text: &str) -> StyleMap {
    PROPERTY_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let key = kebab_to_camel(&caps[1]);
            let value = caps[2].trim();
            (is_known_style_key(&key) && !value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
}

fn flat_style(value: &Value) -> StyleMap {
    style_from_value(value)
        .into_iter()
        .map(|(k, v)| (kebab_to_camel(&k), v))
        .filter(|(k, _)| is_known_style_key(k))
        .collect()
}

/// Interpret a parsed value as a patch.
///
/// Accepts the structured shape (`{"style": {...}, "type": ...}`) or a flat
/// style map (`{"backgroundColor": "red"}`).
pub fn changes_from_value(value: &Value) -> Changes {
    let Some(object) = value.as_object() else {
        return Changes::default();
    };

    let mut changes = if PATCH_KEYS.iter().any(|k| object.contains_key(*k)) {
        match serde_json::from_value::<Changes>(value.clone()) {
            Ok(changes) => changes,
            Err(e) => {
                warn!("Patch from model has unexpected shape: {}", e);
                Changes {
                    style: object.get("style").map(flat_style).unwrap_or_default(),
                    custom_css: object
                        .get("customCSS")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    ..Changes::default()
                }
            }
        }
    } else {
        Changes {
            style: flat_style(value),
            ..Changes::default()
        }
    };

    changes.ensure_flex_display();
    changes
}

/// Full repair pipeline; `None` when nothing usable could be extracted.
pub fn changes_from_output(text: &str) -> Option<Changes> {
    let changes = match parse_lenient(text) {
        Some(value) => changes_from_value(&value),
        None => {
            let mut scraped = Changes {
                style: scrape_properties(text),
                ..Changes::default()
            };
            scraped.ensure_flex_display();
            scraped
        }
    };
    (!changes.is_empty()).then_some(changes)
}

/// Text from the opening brace at `open` to its matching close brace.
fn balanced_block(text: &str, open: usize) -> Option<&str> {
    let mut depth = 0usize;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[open..=open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract the function expression from a handler that embeds markup.
fn handler_from_markup(code: &str) -> Option<String> {
    if let Some(m) = ON_CLICK_ATTR.find(code) {
        let open = m.end() - 1;
        if let Some(block) = balanced_block(code, open) {
            let inner = block[1..block.len() - 1].trim();
            if !inner.is_empty() && !MARKUP_TAG.is_match(inner) {
                return Some(inner.to_string());
            }
        }
    }

    let arrow = ARROW_START.find(code)?;
    let rest = &code[arrow.start()..];
    let body_start = arrow.end() - arrow.start();
    let after = rest[body_start..].trim_start();
    let expression = if after.starts_with('{') {
        let open = rest.len() - after.len();
        let block = balanced_block(rest, open)?;
        format!("{} {}", rest[..body_start].trim(), block)
    } else {
        let end = after.find(['}', '<', '\n']).unwrap_or(after.len());
        format!("{} {}", rest[..body_start].trim(), after[..end].trim())
    };
    (!MARKUP_TAG.is_match(&expression)).then_some(expression)
}

/// Make sure an event handler is a bare expression, never markup.
///
/// Markup-embedded handlers are reduced to their function expression; if
/// that fails the handler becomes a no-op and the discrepancy is logged.
pub fn sanitize_handler(code: &str) -> String {
    let code = code.trim();
    if !MARKUP_TAG.is_match(code) {
        return code.to_string();
    }

    match handler_from_markup(code) {
        Some(expression) => {
            warn!("Extracted handler expression from markup: {}", expression);
            expression
        }
        None => {
            warn!("Replacing markup handler with a no-op: {}", code);
            NOOP_HANDLER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json() {
        let changes = changes_from_output(r#"{"style": {"color": "red"}}"#).unwrap();
        assert_eq!(changes.style.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_fenced_with_prose() {
        let output = "Sure! Here you go:\n```json\n{\"style\": {\"justifyContent\": \"center\"}}\n```\nEnjoy.";
        let changes = changes_from_output(output).unwrap();
        assert_eq!(changes.style.get("justifyContent").map(String::as_str), Some("center"));
        assert_eq!(changes.style.get("display").map(String::as_str), Some("flex"));
    }

    #[test]
    fn test_single_quotes_and_trailing_commas() {
        let output = "The answer is {'style': {'backgroundColor': '#0000ff', 'padding': '8px',},} ok";
        let changes = changes_from_output(output).unwrap();
        assert_eq!(changes.style.get("backgroundColor").map(String::as_str), Some("#0000ff"));
        assert_eq!(changes.style.get("padding").map(String::as_str), Some("8px"));
    }

    #[test]
    fn test_apostrophes_survive_normalization() {
        let normalized = normalize_json("{'children': 'Don't stop'}");
        assert_eq!(normalized, "{\"children\": \"Don't stop\"}");
    }

    #[test]
    fn test_flat_style_map() {
        let changes = changes_from_output(r#"{"background-color": "red", "note": "x"}"#).unwrap();
        assert_eq!(changes.style.get("backgroundColor").map(String::as_str), Some("red"));
        assert!(!changes.style.contains_key("note"));
    }

    #[test]
    fn test_scrape_fallback() {
        let output = "I would set:\nbackground-color: navy;\nfont-size: 18px\nmood: happy";
        let changes = changes_from_output(output).unwrap();
        assert_eq!(changes.style.get("backgroundColor").map(String::as_str), Some("navy"));
        assert_eq!(changes.style.get("fontSize").map(String::as_str), Some("18px"));
        assert!(!changes.style.contains_key("mood"));
    }

    #[test]
    fn test_nothing_usable() {
        assert!(changes_from_output("I am not sure what you mean.").is_none());
        assert!(changes_from_output("{}").is_none());
    }

    #[test]
    fn test_sanitize_plain_handler() {
        assert_eq!(sanitize_handler("alert('hi')"), "alert('hi')");
    }

    #[test]
    fn test_sanitize_markup_handler() {
        let code = r#"<button onClick={() => { window.location.href = '/about'; }}>Go</button>"#;
        assert_eq!(
            sanitize_handler(code),
            "() => { window.location.href = '/about'; }"
        );
    }

    #[test]
    fn test_sanitize_unrecoverable_markup() {
        assert_eq!(sanitize_handler("<div>nope</div>"), NOOP_HANDLER);
        assert_eq!(sanitize_handler("<br/>"), NOOP_HANDLER);
    }

    #[test]
    fn test_sanitize_keeps_comparisons() {
        for code in [
            "() => { if (a < b && c > d) go() }",
            "() => { if (a<b && c>d) go() }",
            "() => setOpen(count >= 1 && count <= max)",
        ] {
            assert_eq!(sanitize_handler(code), code);
        }
    }
}
