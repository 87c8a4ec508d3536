//! Click-action interpretation.
//!
//! Turns "when clicked go to the about page" into an `onClick` handler.
//! The generative path asks a model for a JSON answer; the fallback knows
//! navigation and alert phrasing. Every handler leaving this module has been
//! through [`sanitize_handler`].

use atelier_model::{Changes, Page, PropMap};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::generative::generate_text;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::repair::{changes_from_value, parse_lenient, sanitize_handler};

/// Alert text when the request names none.
pub const DEFAULT_ALERT: &str = "Button clicked!";

lazy_static! {
    static ref NAVIGATE: Regex = Regex::new(
        r"\b(?:navigate|go(?:es)?|redirect(?:s)?|(?:take|send|bring)s?\s+(?:me|them|you|the\s+users?|users)|links?)\s+(?:back\s+)?(?:to\s+)?(?:the\s+)?(.+?)\s*[.!]?$"
    )
    .unwrap();
    static ref PAGE_SUFFIX: Regex = Regex::new(r"\s+(?:page|screen|view|route)\b.*$").unwrap();
    static ref ALERT: Regex = Regex::new(
        r"\b(?:alert|pop\s*up|popup|message|notify|notification|show\s+(?:an?\s+)?(?:alert|message))\b"
    )
    .unwrap();
    static ref QUOTED: Regex = Regex::new(r#"["“']([^"”']+)["”']"#).unwrap();
    static ref SAYING: Regex = Regex::new(
        r"(?i)\b(?:saying|says|that\s+says|with\s+(?:the\s+)?(?:text|message))\s+(.+?)\s*[.!]?$"
    )
    .unwrap();
    static ref LOGIN: Regex = Regex::new(r"\b(?:log\s*in|sign\s*in)\b").unwrap();
    static ref CLAUSE_END: Regex = Regex::new(r"\s+(?:and|then)\s+.*$").unwrap();
}

/// Input to action interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub message: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub current_props: Option<PropMap>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl ActionRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_pages(mut self, pages: Vec<Page>) -> Self {
        self.pages = pages;
        self
    }

    /// `(name, route)` pairs for prompting.
    pub fn page_routes(&self) -> Vec<(String, String)> {
        self.pages
            .iter()
            .map(|p| (p.name.clone(), p.route()))
            .collect()
    }
}

/// Interpreted action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub action_code: String,
    pub explanation: String,
    pub changes: Changes,
    pub detailed_changes: Vec<String>,
    pub project_impact: String,
}

impl ActionResult {
    /// Whether any handler was produced.
    pub fn has_action(&self) -> bool {
        !self.action_code.is_empty()
    }

    /// Run every handler through [`sanitize_handler`] and make sure the
    /// patch carries the action as `onClick`.
    pub fn sanitized(mut self) -> Self {
        if !self.action_code.is_empty() {
            self.action_code = sanitize_handler(&self.action_code);
        }
        let props = self.changes.props.get_or_insert_with(PropMap::new);
        match props.get("onClick").and_then(Value::as_str).map(sanitize_handler) {
            Some(handler) => {
                props.insert("onClick".to_string(), Value::String(handler.clone()));
                if self.action_code.is_empty() {
                    self.action_code = handler;
                }
            }
            None if !self.action_code.is_empty() => {
                props.insert(
                    "onClick".to_string(),
                    Value::String(self.action_code.clone()),
                );
            }
            None => {}
        }
        if props.is_empty() {
            self.changes.props = None;
        }
        self
    }
}

fn string_field(object: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| object.get(*k))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Parse a model's action answer; `None` when it holds no handler.
pub fn action_from_output(text: &str) -> Option<ActionResult> {
    let value = parse_lenient(text)?;
    let object = value.as_object()?;

    let detailed_changes = match object
        .get("detailed_changes")
        .or_else(|| object.get("detailedChanges"))
    {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };

    let result = ActionResult {
        action_code: string_field(object, &["action_code", "actionCode"]),
        explanation: string_field(object, &["explanation"]),
        changes: object.get("changes").map(changes_from_value).unwrap_or_default(),
        detailed_changes,
        project_impact: string_field(object, &["project_impact", "projectImpact"]),
    }
    .sanitized();

    result.has_action().then_some(result)
}

/// Ask a model to interpret an action; `None` on failure or unusable output.
pub async fn interpret_action_via_model(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> Option<ActionResult> {
    let raw = generate_text(generator, request).await?;
    let result = action_from_output(&raw);
    if result.is_none() {
        debug!("No action in output of {}", request.model);
    }
    result
}

fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Route for a navigation target phrase, and whether a page owns it.
pub fn resolve_route(target: &str, pages: &[Page]) -> (String, bool) {
    let target = target.trim().trim_matches(|c| c == '"' || c == '\'');
    if target.starts_with('/') || target.starts_with("http://") || target.starts_with("https://") {
        let known = pages.iter().any(|p| p.route() == target);
        return (target.to_string(), known);
    }

    let phrase = PAGE_SUFFIX.replace(target, "").trim().to_lowercase();
    let slug = atelier_model::slugify(&phrase);

    let exact = pages.iter().find(|p| {
        p.name.to_lowercase() == phrase || p.route().trim_start_matches('/') == slug
    });
    let partial = || {
        pages.iter().find(|p| {
            let name = p.name.to_lowercase();
            !name.is_empty() && !phrase.is_empty() && (phrase.contains(&name) || name.contains(&phrase))
        })
    };
    if let Some(page) = exact.or_else(partial) {
        return (page.route(), true);
    }

    let route = if LOGIN.is_match(&phrase) { "/login" } else { "/" };
    let known = pages.iter().any(|p| p.route() == route);
    (route.to_string(), known)
}

fn alert_text(message: &str) -> String {
    QUOTED
        .captures(message)
        .or_else(|| SAYING.captures(message))
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ALERT.to_string())
}

/// Deterministic interpretation of navigation and alert requests.
pub fn interpret_action_patterns(request: &ActionRequest) -> ActionResult {
    let lower = request.message.trim().to_lowercase();
    let mut statements = Vec::new();
    let mut detailed_changes = Vec::new();
    let mut explanation = Vec::new();
    let mut project_impact = String::new();

    if ALERT.is_match(&lower) {
        let text = alert_text(&request.message);
        statements.push(format!("alert('{}');", escape_js(&text)));
        detailed_changes.push(format!("Show an alert saying \"{}\" on click", text));
        explanation.push(format!("shows an alert saying \"{}\"", text));
    }

    if let Some(caps) = NAVIGATE.captures(&lower) {
        let target = CLAUSE_END.replace(&caps[1], "");
        let (route, known) = resolve_route(&target, &request.pages);
        statements.push(format!("window.location.href = '{}';", escape_js(&route)));
        detailed_changes.push(format!("Navigate to {} on click", route));
        explanation.push(format!("navigates to {}", route));
        if !known && !route.starts_with("http") {
            project_impact = format!("No page owns {} yet; add one or the link will 404.", route);
        }
    }

    if statements.is_empty() {
        return ActionResult {
            explanation: "Could not determine an action for this request".to_string(),
            ..ActionResult::default()
        };
    }

    let replaces_existing = request
        .current_props
        .as_ref()
        .is_some_and(|props| props.contains_key("onClick"));
    if replaces_existing {
        detailed_changes.push("Replace the existing onClick handler".to_string());
    }

    let subject = request.component_type.as_deref().unwrap_or("component");
    ActionResult {
        action_code: format!("() => {{ {} }}", statements.join(" ")),
        explanation: format!("Clicking the {} {}.", subject, explanation.join(" and ")),
        changes: Changes::default(),
        detailed_changes,
        project_impact,
    }
    .sanitized()
}
