//! Intent guessing for prompts that produced no patch.
//!
//! A prompt is sorted into keyword categories and restated in phrasing the
//! pattern interpreter understands. The caller either applies the guess
//! silently, asks the user to confirm it, or shows example phrasings.

use atelier_model::normalize_color;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Guess used when nothing more specific can be said.
pub const GENERIC_GUESS: &str = "modify component style";

/// Keyword category of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Center,
    Color,
    Size,
    Text,
    Spacing,
    Border,
    Opacity,
    Visibility,
    Button,
    Input,
}

impl IntentCategory {
    pub const ALL: [IntentCategory; 10] = [
        Self::Center,
        Self::Color,
        Self::Size,
        Self::Text,
        Self::Spacing,
        Self::Border,
        Self::Opacity,
        Self::Visibility,
        Self::Button,
        Self::Input,
    ];

    fn keywords(&self) -> &'static Regex {
        match self {
            Self::Center => &CENTER,
            Self::Color => &COLOR,
            Self::Size => &SIZE,
            Self::Text => &TEXT,
            Self::Spacing => &SPACING,
            Self::Border => &BORDER,
            Self::Opacity => &OPACITY,
            Self::Visibility => &VISIBILITY,
            Self::Button => &BUTTON,
            Self::Input => &INPUT,
        }
    }

    /// Example phrasings offered when the prompt cannot be understood.
    pub fn examples(&self) -> &'static [&'static str] {
        match self {
            Self::Center => &["center the content", "center on screen"],
            Self::Color => &["make background blue", "make text white"],
            Self::Size => &["set width to 300px", "make the text bigger"],
            Self::Text => &["change text to \"Welcome\""],
            Self::Spacing => &["add padding", "set margin to 16px"],
            Self::Border => &["add a 2px solid gray border", "make corners rounded"],
            Self::Opacity => &["set opacity to 50%"],
            Self::Visibility => &["hide it", "make it visible"],
            Self::Button => &["change it to a button"],
            Self::Input => &["change it to an input", "set placeholder to \"Email\""],
        }
    }
}

/// Examples shown when no category was detected.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "make background blue",
    "center the content",
    "set width to 300px",
    "change text to \"Hello\"",
    "add padding",
];

lazy_static! {
    static ref CENTER: Regex = Regex::new(r"\b(?:cent(?:er|re)(?:ed)?|middle)\b").unwrap();
    static ref COLOR: Regex = Regex::new(r"\b(?:colou?rs?|background|bg|shade|tint)\b").unwrap();
    static ref SIZE: Regex = Regex::new(
        r"\b(?:size|bigger|larger|smaller|wider|narrower|taller|shorter|width|height|big|small|huge|tiny)\b"
    )
    .unwrap();
    static ref TEXT: Regex = Regex::new(r"\b(?:text|label|title|caption|words?|says?|wording)\b").unwrap();
    static ref SPACING: Regex = Regex::new(r"\b(?:padding|margins?|space|spacing|gap|room)\b").unwrap();
    static ref BORDER: Regex = Regex::new(r"\b(?:border|outline|edges?|corners?|rounded|round)\b").unwrap();
    static ref OPACITY: Regex =
        Regex::new(r"\b(?:opacity|transparent|transparency|fade|faded|see[\s-]through)\b").unwrap();
    static ref VISIBILITY: Regex =
        Regex::new(r"\b(?:hide|hidden|invisible|visible|show|disappear|appear)\b").unwrap();
    static ref BUTTON: Regex = Regex::new(r"\b(?:button|btn|clickable)\b").unwrap();
    static ref INPUT: Regex = Regex::new(r"\b(?:input|field|textbox|text\s+box)\b").unwrap();

    static ref SCREEN: Regex = Regex::new(r"\b(?:screen|page|viewport|window)\b").unwrap();
    static ref BACKGROUND_CUE: Regex = Regex::new(r"\b(?:background|bg)\b").unwrap();
    static ref TEXT_CUE: Regex = Regex::new(r"\b(?:text|font|words?|label|title)\b").unwrap();
    static ref QUOTED: Regex = Regex::new(r#"["“']([^"”']+)["”']"#).unwrap();
    static ref DIMENSION: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*(px|%|em|rem|vw|vh)?").unwrap();
    static ref BIGGER: Regex = Regex::new(r"\b(?:bigger|larger|big|huge|increase)\b").unwrap();
    static ref SMALLER: Regex = Regex::new(r"\b(?:smaller|small|tiny|decrease)\b").unwrap();
    static ref HEIGHT_CUE: Regex = Regex::new(r"\b(?:height|tall|taller|shorter)\b").unwrap();
    static ref WIDTH_CUE: Regex = Regex::new(r"\b(?:width|wide|wider|narrower)\b").unwrap();
    static ref MARGIN_CUE: Regex = Regex::new(r"\b(?:margins?|outside)\b").unwrap();
    static ref ROUND_CUE: Regex = Regex::new(r"\b(?:corners?|rounded|round)\b").unwrap();
    static ref HIDE_CUE: Regex = Regex::new(r"\b(?:hide|hidden|invisible|disappear)\b").unwrap();
    static ref NUMBER: Regex = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();
    static ref ACTION_VERB: Regex = Regex::new(
        r"\b(make|set|change|turn|add|remove|put|move|give|update|adjust)\s+(.+?)\s*[.!?]*$"
    )
    .unwrap();

    static ref AUTO_APPLY: Vec<Regex> = vec![
        Regex::new(r"^(?:make|set|change|turn|paint)\s+(?:the\s+|it\s+|its\s+)?(?:background|bg|colou?r|text|font)\b").unwrap(),
        Regex::new(r"^(?:cent(?:er|re))\b").unwrap(),
        Regex::new(r"^(?:add|remove|increase|decrease)\s+(?:some\s+|the\s+|a\s+)?(?:padding|margins?|border|spacing)\b").unwrap(),
        Regex::new(r"^(?:hide|show)\b").unwrap(),
        Regex::new(r"^(?:make|set)\s+(?:it\s+|the\s+)?(?:bigger|smaller|larger|wider|taller|width|height)\b").unwrap(),
    ];
}

/// Categories whose keywords occur in `prompt`, in canonical order.
pub fn detect_categories(prompt: &str) -> Vec<IntentCategory> {
    let lower = prompt.to_lowercase();
    IntentCategory::ALL
        .iter()
        .copied()
        .filter(|c| c.keywords().is_match(&lower) || (*c == IntentCategory::Color && color_name(&lower).is_some()))
        .collect()
}

/// The color word as written ("light blue", "red", "#0af").
fn color_name(lower: &str) -> Option<String> {
    let tokens: Vec<&str> = lower
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .filter(|t| !t.is_empty())
        .collect();
    for (i, token) in tokens.iter().enumerate() {
        if let Some(next) = tokens.get(i + 1) {
            let pair = format!("{} {}", token, next);
            if normalize_color(&pair).is_some() {
                return Some(pair);
            }
        }
        if normalize_color(token).is_some() {
            return Some(token.to_string());
        }
    }
    None
}

fn dimension(lower: &str) -> Option<String> {
    DIMENSION.captures(lower).map(|caps| {
        let unit = caps.get(2).map_or("px", |m| m.as_str());
        format!("{}{}", &caps[1], unit)
    })
}

fn restate(category: IntentCategory, prompt: &str, lower: &str, component_type: Option<&str>) -> Option<String> {
    match category {
        IntentCategory::Center => Some(if SCREEN.is_match(lower) {
            "center on screen".to_string()
        } else {
            "center the content".to_string()
        }),
        IntentCategory::Color => {
            let color = color_name(lower)?;
            let target = if TEXT_CUE.is_match(lower) && !BACKGROUND_CUE.is_match(lower) {
                "text"
            } else {
                "background"
            };
            Some(format!("make {} {}", target, color))
        }
        IntentCategory::Size => {
            if let Some(value) = dimension(lower) {
                if HEIGHT_CUE.is_match(lower) {
                    return Some(format!("set height to {}", value));
                }
                if WIDTH_CUE.is_match(lower) {
                    return Some(format!("set width to {}", value));
                }
            }
            if BIGGER.is_match(lower) {
                Some("make the text bigger".to_string())
            } else if SMALLER.is_match(lower) {
                Some("make the text smaller".to_string())
            } else {
                None
            }
        }
        IntentCategory::Text => QUOTED
            .captures(prompt)
            .map(|caps| format!("change text to \"{}\"", caps[1].trim())),
        IntentCategory::Spacing => {
            let property = if MARGIN_CUE.is_match(lower) { "margin" } else { "padding" };
            Some(match NUMBER.captures(lower) {
                Some(caps) => format!("set {} to {}px", property, &caps[1]),
                None => format!("add {}", property),
            })
        }
        IntentCategory::Border => Some(if ROUND_CUE.is_match(lower) {
            "make corners rounded".to_string()
        } else {
            "add a border".to_string()
        }),
        IntentCategory::Opacity => Some(match NUMBER.captures(lower) {
            Some(caps) => format!("set opacity to {}", &caps[1]),
            None => "make it semi-transparent".to_string(),
        }),
        IntentCategory::Visibility => Some(if HIDE_CUE.is_match(lower) {
            "hide it".to_string()
        } else {
            "make it visible".to_string()
        }),
        IntentCategory::Button => {
            (component_type != Some("button")).then(|| "change it to a button".to_string())
        }
        IntentCategory::Input => {
            (component_type != Some("input")).then(|| "change it to an input".to_string())
        }
    }
}

/// Restate `prompt` as something the pattern interpreter understands.
///
/// `None` only for a blank prompt; otherwise at worst [`GENERIC_GUESS`].
pub fn guess_intent(prompt: &str, component_type: Option<&str>) -> Option<String> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return None;
    }
    let lower = prompt.to_lowercase();

    let mut parts: Vec<String> = Vec::new();
    for category in detect_categories(&lower) {
        if let Some(text) = restate(category, prompt, &lower, component_type) {
            if !parts.contains(&text) {
                parts.push(text);
            }
        }
    }
    if !parts.is_empty() {
        return Some(parts.join(" and "));
    }

    if let Some(caps) = ACTION_VERB.captures(&lower) {
        return Some(format!("{} {}", &caps[1], caps[2].trim()));
    }
    Some(GENERIC_GUESS.to_string())
}

/// Whether `prompt` is phrased directly enough to apply a guess silently.
pub fn is_auto_applicable(prompt: &str) -> bool {
    let lower = prompt.trim().to_lowercase();
    AUTO_APPLY.iter().any(|re| re.is_match(&lower))
}

/// Response for a prompt that produced no patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarification {
    pub needs_clarification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Decide how to follow up on a prompt that produced no patch.
pub fn clarify(prompt: &str, component_type: Option<&str>) -> Clarification {
    match guess_intent(prompt, component_type) {
        Some(guess) if guess != GENERIC_GUESS => {
            if is_auto_applicable(prompt) {
                Clarification {
                    needs_clarification: false,
                    message: format!("Applying \"{}\"", guess),
                    guess: Some(guess),
                    suggestions: Vec::new(),
                }
            } else {
                Clarification {
                    needs_clarification: true,
                    message: format!("Did you mean \"{}\"?", guess),
                    suggestions: vec![guess.clone()],
                    guess: Some(guess),
                }
            }
        }
        _ => not_understood(prompt),
    }
}

/// "Could not understand" response with example phrasings.
pub fn not_understood(prompt: &str) -> Clarification {
    Clarification {
        needs_clarification: true,
        guess: None,
        message: "I couldn't understand that request. Try one of these:".to_string(),
        suggestions: suggestions_for(prompt),
    }
}

/// Example phrasings tailored to the categories `prompt` touches.
pub fn suggestions_for(prompt: &str) -> Vec<String> {
    let categories = detect_categories(prompt);
    if categories.is_empty() {
        return DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }
    categories
        .iter()
        .flat_map(|c| c.examples().iter())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_guess() {
        assert_eq!(
            guess_intent("the bg should look kinda blue", None).as_deref(),
            Some("make background blue")
        );
        assert_eq!(
            guess_intent("words in light blue please", None).as_deref(),
            Some("make text light blue")
        );
    }

    #[test]
    fn test_combined_guess() {
        assert_eq!(
            guess_intent("I want it red and in the middle", None).as_deref(),
            Some("center the content and make background red")
        );
    }

    #[test]
    fn test_component_aware_guess() {
        assert_eq!(
            guess_intent("clickable thing", Some("div")).as_deref(),
            Some("change it to a button")
        );
        assert_eq!(
            guess_intent("clickable thing", Some("button")).as_deref(),
            Some(GENERIC_GUESS)
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(guess_intent("   ", None), None);
        assert_eq!(
            guess_intent("please make it pop", None).as_deref(),
            Some("make it pop")
        );
        assert_eq!(guess_intent("hmm", None).as_deref(), Some(GENERIC_GUESS));
    }

    #[test]
    fn test_auto_apply() {
        let clarification = clarify("make the background sort of red-ish", None);
        assert!(!clarification.needs_clarification);
        assert_eq!(clarification.guess.as_deref(), Some("make background red"));
    }

    #[test]
    fn test_confirmation() {
        let clarification = clarify("I want it red", None);
        assert!(clarification.needs_clarification);
        assert_eq!(clarification.message, "Did you mean \"make background red\"?");
    }

    #[test]
    fn test_generic_guess_gives_suggestions() {
        let clarification = clarify("hmm", None);
        assert!(clarification.needs_clarification);
        assert!(clarification.guess.is_none());
        assert_eq!(clarification.suggestions.len(), DEFAULT_SUGGESTIONS.len());

        let clarification = clarify("the outline thing", None);
        assert!(clarification.guess.is_some());
    }

    #[test]
    fn test_tailored_suggestions() {
        let suggestions = suggestions_for("something about spacing");
        assert!(suggestions.contains(&"add padding".to_string()));
    }
}
