//! Value probes shared by the pseudo-state and style rules.
//!
//! All probes run against the lowercased prompt.

use atelier_model::normalize_color;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WIDTH_RE: Regex = Regex::new(
        r"(?:\b(min|max)[\s-])?\bwidth\b\s*(?:(?:to|=|:|of|is|at|by)\s*)?(\d+(?:\.\d+)?)\s*(px|pixels?|%|percent|em|rem|vw|vh|pt)?"
    )
    .unwrap();
    static ref WIDE_RE: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*(px|pixels?|%|percent|em|rem|vw|vh|pt)?\s+wide\b").unwrap();
    static ref FULL_WIDTH_RE: Regex = Regex::new(r"\bfull[\s-]width\b").unwrap();
    static ref HEIGHT_RE: Regex = Regex::new(
        r"(?:\b(min|max|line)[\s-])?\bheight\b\s*(?:(?:to|=|:|of|is|at|by)\s*)?(\d+(?:\.\d+)?)\s*(px|pixels?|%|percent|em|rem|vw|vh|pt)?"
    )
    .unwrap();
    static ref TALL_RE: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*(px|pixels?|%|percent|em|rem|vw|vh|pt)?\s+tall\b").unwrap();
    static ref FULL_HEIGHT_RE: Regex = Regex::new(r"\bfull[\s-]height\b").unwrap();
    static ref BACKGROUND_RE: Regex = Regex::new(
        r"\b(?:background|bg)(?:[\s-]colou?r)?\s*(?:(?:to|=|:|as|into|of|is|with)\s*)?(?:(?:be|a|an)\s+)?(#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)|[a-z]+(?:\s+[a-z]+)?)"
    )
    .unwrap();
    static ref COLOR_BEFORE_BACKGROUND_RE: Regex =
        Regex::new(r"(#[0-9a-f]{3,8}|[a-z]+)\s+(?:background|bg)\b").unwrap();
    static ref TEXT_COLOR_RE: Regex = Regex::new(
        r"\b(?:text|font)[\s-]colou?r\s*(?:(?:to|=|:|as|into|of|is)\s*)?(?:be\s+)?(#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)|[a-z]+(?:\s+[a-z]+)?)"
    )
    .unwrap();
    static ref TEXT_TO_COLOR_RE: Regex = Regex::new(
        r"\b(?:make|set|turn|change)\s+(?:the\s+)?(?:text|font|words?|label)\s+(?:colou?r\s+)?(?:to\s+)?(#[0-9a-f]{3,8}\b|[a-z]+(?:\s+[a-z]+)?)"
    )
    .unwrap();
    static ref COLOR_BEFORE_TEXT_RE: Regex =
        Regex::new(r"(#[0-9a-f]{3,8}|[a-z]+)\s+(?:text|font|letters|words)\b").unwrap();
    static ref TEXT_CUE_RE: Regex =
        Regex::new(r"\b(?:text|font|words?|label|title|heading|letters?|writing)\b").unwrap();
}

/// Format a number with a unit, defaulting to `px`.
pub fn dimension(number: &str, unit: Option<&str>) -> String {
    let unit = match unit {
        None => "px",
        Some(u) if u.starts_with("pixel") => "px",
        Some("percent") => "%",
        Some(u) => u,
    };
    format!("{}{}", number, unit)
}

/// Format a float without trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{}", rounded)
}

fn first_plain_dimension(re: &Regex, lower: &str) -> Option<String> {
    re.captures_iter(lower)
        .find(|caps| caps.get(1).is_none())
        .map(|caps| dimension(&caps[2], caps.get(3).map(|m| m.as_str())))
}

/// Width mentioned in the prompt (`width 500`, `300px wide`, `full width`).
pub fn extract_width(lower: &str) -> Option<String> {
    if let Some(value) = first_plain_dimension(&WIDTH_RE, lower) {
        return Some(value);
    }
    if let Some(caps) = WIDE_RE.captures(lower) {
        return Some(dimension(&caps[1], caps.get(2).map(|m| m.as_str())));
    }
    FULL_WIDTH_RE.is_match(lower).then(|| "100%".to_string())
}

/// Height mentioned in the prompt (`height 200`, `200px tall`, `full height`).
pub fn extract_height(lower: &str) -> Option<String> {
    if let Some(value) = first_plain_dimension(&HEIGHT_RE, lower) {
        return Some(value);
    }
    if let Some(caps) = TALL_RE.captures(lower) {
        return Some(dimension(&caps[1], caps.get(2).map(|m| m.as_str())));
    }
    FULL_HEIGHT_RE.is_match(lower).then(|| "100%".to_string())
}

/// Resolve a captured color phrase, trying the whole phrase first
/// ("light blue") and then its first word ("blue and").
pub fn resolve_color(phrase: &str) -> Option<String> {
    normalize_color(phrase).or_else(|| {
        phrase
            .split_whitespace()
            .next()
            .and_then(normalize_color)
    })
}

/// Explicit background color.
pub fn extract_background(lower: &str) -> Option<String> {
    BACKGROUND_RE
        .captures_iter(lower)
        .find_map(|caps| resolve_color(&caps[1]))
        .or_else(|| {
            COLOR_BEFORE_BACKGROUND_RE
                .captures_iter(lower)
                .find_map(|caps| normalize_color(&caps[1]))
        })
}

/// Explicit text color.
pub fn extract_text_color(lower: &str) -> Option<String> {
    TEXT_COLOR_RE
        .captures_iter(lower)
        .find_map(|caps| resolve_color(&caps[1]))
        .or_else(|| {
            TEXT_TO_COLOR_RE
                .captures_iter(lower)
                .find_map(|caps| resolve_color(&caps[1]))
        })
        .or_else(|| {
            COLOR_BEFORE_TEXT_RE
                .captures_iter(lower)
                .find_map(|caps| normalize_color(&caps[1]))
        })
}

fn color_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// First color word anywhere in `text`; two-word names win over one-word.
pub fn first_color_word(text: &str) -> Option<String> {
    let tokens = color_tokens(text);
    for (i, token) in tokens.iter().enumerate() {
        if let Some(next) = tokens.get(i + 1) {
            if let Some(color) = normalize_color(&format!("{}{}", token, next)) {
                return Some(color);
            }
        }
        if let Some(color) = normalize_color(token) {
            return Some(color);
        }
    }
    None
}

/// Last color word in `text`.
pub fn last_color_word(text: &str) -> Option<String> {
    color_tokens(text)
        .into_iter()
        .rev()
        .find_map(normalize_color)
}

/// Whether the prompt talks about text rather than the box.
pub fn mentions_text(lower: &str) -> bool {
    TEXT_CUE_RE.is_match(lower)
}
