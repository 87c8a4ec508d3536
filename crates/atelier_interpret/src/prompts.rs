//! System prompts sent to generative backends.

use atelier_model::{PropMap, StyleMap};

/// Instructions for style/content interpretation.
pub const STYLE_SYSTEM_PROMPT: &str = r##"You translate UI edit requests into a JSON patch for a single component.

Respond with ONE JSON object and nothing else. Allowed keys:
- "style": object of camelCase CSS properties to string values, e.g. {"backgroundColor": "#0000ff"}
- "customCSS": string of CSS for pseudo states, e.g. ":hover {\n  width: 500px;\n}"
- "type": replacement HTML tag name, e.g. "button"
- "props": object of HTML attributes or text content ("children", "placeholder", "href", "src", "alt", "disabled", "required")
- "wrap_in": tag name of a new parent element to wrap the component in

Rules:
- Use hex values for named colors.
- Hover, focus and active requests go into "customCSS" only, never into "style".
- If you set justifyContent or alignItems, also set display to "flex".
- Omit keys you do not change. No comments, no trailing commas."##;

/// Instructions for click-action interpretation.
pub const ACTION_SYSTEM_PROMPT: &str = r##"You translate requests about what a UI element should DO into JavaScript event handlers.

Respond with ONE JSON object and nothing else:
{
  "action_code": "a bare JavaScript arrow function, e.g. () => { window.location.href = '/about'; }",
  "explanation": "one sentence describing the behavior",
  "changes": {"props": {"onClick": "<same function as action_code>"}},
  "detailed_changes": ["short list of what changes"],
  "project_impact": "what else in the project is affected, or an empty string"
}

Never return JSX or HTML markup in action_code or onClick. Only the function expression."##;

fn describe_map<V: std::fmt::Display>(entries: impl Iterator<Item = (String, V)>) -> String {
    entries
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// User message for style interpretation, with the component's current state.
pub fn style_user_prompt(
    prompt: &str,
    component_type: Option<&str>,
    current_style: Option<&StyleMap>,
    current_props: Option<&PropMap>,
) -> String {
    let mut message = String::new();
    if let Some(component_type) = component_type {
        message.push_str(&format!("Component type: {}\n", component_type));
    }
    if let Some(style) = current_style.filter(|s| !s.is_empty()) {
        message.push_str(&format!(
            "Current style: {}\n",
            describe_map(style.iter().map(|(k, v)| (k.clone(), v.clone())))
        ));
    }
    if let Some(props) = current_props.filter(|p| !p.is_empty()) {
        message.push_str(&format!(
            "Current props: {}\n",
            describe_map(
                props
                    .iter()
                    .filter(|(k, _)| k.as_str() != "style" && k.as_str() != "children")
                    .map(|(k, v)| (k.clone(), v.to_string()))
            )
        ));
    }
    message.push_str(&format!("Request: {}", prompt));
    message
}

/// User message for action interpretation.
pub fn action_user_prompt(
    message: &str,
    component_type: Option<&str>,
    component_id: Option<&str>,
    page_routes: &[(String, String)],
) -> String {
    let mut text = String::new();
    if let Some(component_type) = component_type {
        text.push_str(&format!("Component type: {}\n", component_type));
    }
    if let Some(id) = component_id {
        text.push_str(&format!("Component id: {}\n", id));
    }
    if !page_routes.is_empty() {
        text.push_str("Pages:\n");
        for (name, route) in page_routes {
            text.push_str(&format!("- {} ({})\n", name, route));
        }
    }
    text.push_str(&format!("Request: {}", message));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_prompt_includes_context() {
        let style = StyleMap::from([("color".to_string(), "#000000".to_string())]);
        let text = style_user_prompt("make it red", Some("button"), Some(&style), None);
        assert!(text.contains("Component type: button"));
        assert!(text.contains("color: #000000"));
        assert!(text.ends_with("Request: make it red"));
    }

    #[test]
    fn test_action_prompt_lists_pages() {
        let pages = vec![("About".to_string(), "/about".to_string())];
        let text = action_user_prompt("go to about", None, Some("btn-1"), &pages);
        assert!(text.contains("- About (/about)"));
        assert!(text.contains("Component id: btn-1"));
    }

    #[test]
    fn test_system_prompts_are_complete() {
        assert!(STYLE_SYSTEM_PROMPT.contains(r##"{"backgroundColor": "#0000ff"}"##));
        assert!(STYLE_SYSTEM_PROMPT.ends_with("No comments, no trailing commas."));
        assert!(ACTION_SYSTEM_PROMPT.contains("\"action_code\""));
        assert!(ACTION_SYSTEM_PROMPT.ends_with("Only the function expression."));
    }
}
