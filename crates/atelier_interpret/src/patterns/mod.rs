//! Deterministic, rule-table driven prompt interpretation.
//!
//! Used whenever no generative backend is configured or when the backend
//! produced nothing usable. Rules are grouped and evaluated in priority
//! order:
//!
//! | Group         | Policy                                         |
//! |---------------|------------------------------------------------|
//! | `PseudoState` | first match returns the patch immediately      |
//! | `Structural`  | first match returns the patch immediately      |
//! | `TypeChange`  | first match wins, evaluation continues         |
//! | `Content`     | every rule runs, results are additive          |
//! | `Style`       | every rule runs, results are additive          |
//!
//! The returned patch always satisfies the flex invariant.

mod content;
mod pseudo;
mod structural;
mod style;
mod type_change;
pub mod values;

use atelier_model::{Changes, PropMap, StyleMap};
use tracing::debug;

/// A prompt with its lowercased form precomputed.
#[derive(Debug, Clone)]
pub struct Prompt {
    raw: String,
    lower: String,
}

impl Prompt {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_lowercase();
        Self { raw, lower }
    }

    /// The prompt as typed (used where case matters, e.g. text content).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }
}

/// What we know about the component being edited.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpretContext<'a> {
    pub component_type: Option<&'a str>,
    pub current_style: Option<&'a StyleMap>,
    pub current_props: Option<&'a PropMap>,
}

impl<'a> InterpretContext<'a> {
    /// Whether the component currently has a height or min-height.
    pub fn has_height(&self) -> bool {
        self.current_style
            .map(|s| s.contains_key("height") || s.contains_key("minHeight"))
            .unwrap_or(false)
    }
}

/// Priority groups of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    PseudoState,
    Structural,
    TypeChange,
    Content,
    Style,
}

/// How a group reacts when one of its rules fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPolicy {
    /// Stop interpreting and return the patch as built so far
    ReturnOnMatch,
    /// Skip the rest of the group
    FirstMatch,
    /// Keep evaluating the group
    All,
}

impl RuleGroup {
    pub const ORDER: [RuleGroup; 5] = [
        RuleGroup::PseudoState,
        RuleGroup::Structural,
        RuleGroup::TypeChange,
        RuleGroup::Content,
        RuleGroup::Style,
    ];

    pub fn policy(&self) -> GroupPolicy {
        match self {
            Self::PseudoState | Self::Structural => GroupPolicy::ReturnOnMatch,
            Self::TypeChange => GroupPolicy::FirstMatch,
            Self::Content | Self::Style => GroupPolicy::All,
        }
    }
}

/// Extractor signature: returns `true` when the rule fired.
pub type Extractor = fn(&Prompt, &InterpretContext<'_>, &mut Changes) -> bool;

/// One `(predicate, extractor)` entry of the table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub group: RuleGroup,
    pub extract: Extractor,
}

impl Rule {
    pub const fn new(name: &'static str, group: RuleGroup, extract: Extractor) -> Self {
        Self {
            name,
            group,
            extract,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("group", &self.group)
            .finish()
    }
}

/// Ordered list of rules.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// The built-in rule set.
    pub fn standard() -> Self {
        let mut rules = Vec::new();
        rules.extend_from_slice(pseudo::RULES);
        rules.extend_from_slice(structural::RULES);
        rules.extend_from_slice(type_change::RULES);
        rules.extend_from_slice(content::RULES);
        rules.extend_from_slice(style::RULES);
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Evaluate every group in priority order.
    pub fn evaluate(&self, prompt: &Prompt, ctx: &InterpretContext<'_>) -> Changes {
        let mut changes = Changes::default();

        for group in RuleGroup::ORDER {
            let policy = group.policy();
            for rule in self.rules.iter().filter(|r| r.group == group) {
                if !(rule.extract)(prompt, ctx, &mut changes) {
                    continue;
                }
                debug!("Rule {} matched", rule.name);
                match policy {
                    GroupPolicy::ReturnOnMatch => {
                        changes.ensure_flex_display();
                        return changes;
                    }
                    GroupPolicy::FirstMatch => break,
                    GroupPolicy::All => {}
                }
            }
        }

        changes.ensure_flex_display();
        changes
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pattern-based interpreter over the standard rule table.
#[derive(Debug, Clone, Default)]
pub struct PatternInterpreter {
    table: RuleTable,
}

impl PatternInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Interpret a free-text instruction. Never fails; no match yields an
    /// empty patch.
    pub fn interpret(
        &self,
        prompt: &str,
        component_type: Option<&str>,
        current_style: Option<&StyleMap>,
        current_props: Option<&PropMap>,
    ) -> Changes {
        let ctx = InterpretContext {
            component_type,
            current_style,
            current_props,
        };
        self.table.evaluate(&Prompt::new(prompt), &ctx)
    }

    /// Run a single named rule in isolation.
    pub fn apply_rule(&self, name: &str, prompt: &str, ctx: &InterpretContext<'_>) -> Option<Changes> {
        let rule = self.table.get(name)?;
        let mut changes = Changes::default();
        (rule.extract)(&Prompt::new(prompt), ctx, &mut changes).then_some(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(prompt: &str) -> Changes {
        PatternInterpreter::new().interpret(prompt, None, None, None)
    }

    #[test]
    fn test_background_only() {
        let changes = interpret("make background blue");
        assert_eq!(changes, Changes::with_style([("backgroundColor", "#0000ff")]));
    }

    #[test]
    fn test_hover_width() {
        let changes = interpret("when cursor hover change width to 500px");
        assert_eq!(changes.custom_css.as_deref(), Some(":hover {\n  width: 500px;\n}"));
        assert!(changes.style.is_empty());
        assert!(changes.props.is_none());
    }

    #[test]
    fn test_hover_button_routes_to_pseudo() {
        let changes = interpret("on hover make the button red");
        assert_eq!(
            changes.custom_css.as_deref(),
            Some(":hover {\n  background-color: #ff0000;\n}")
        );
        assert!(changes.component_type.is_none());
        assert!(changes.style.is_empty());
    }

    #[test]
    fn test_center_on_screen() {
        let changes = interpret("center content on screen");
        let get = |k: &str| changes.style.get(k).map(String::as_str);
        assert_eq!(get("display"), Some("flex"));
        assert_eq!(get("justifyContent"), Some("center"));
        assert_eq!(get("alignItems"), Some("center"));
        assert_eq!(get("minHeight"), Some("100vh"));
        assert_eq!(get("height"), Some("100vh"));
    }

    #[test]
    fn test_background_and_center() {
        let changes = interpret("make background blue and center it");
        let get = |k: &str| changes.style.get(k).map(String::as_str);
        assert_eq!(get("backgroundColor"), Some("#0000ff"));
        assert_eq!(get("display"), Some("flex"));
        assert_eq!(get("justifyContent"), Some("center"));
        assert_eq!(get("alignItems"), Some("center"));
        assert_eq!(get("minHeight"), Some("100%"));
    }

    #[test]
    fn test_center_keeps_existing_height() {
        let style = StyleMap::from([("height".to_string(), "300px".to_string())]);
        let changes = PatternInterpreter::new().interpret("center it", None, Some(&style), None);
        assert!(!changes.style.contains_key("minHeight"));
        assert_eq!(changes.style.get("alignItems").map(String::as_str), Some("center"));
    }

    #[test]
    fn test_color_normalization() {
        for prompt in ["make background red", "make background RED", "make background #ff0000"] {
            let changes = interpret(prompt);
            assert_eq!(
                changes.style.get("backgroundColor").map(String::as_str),
                Some("#ff0000"),
                "prompt: {}",
                prompt
            );
        }
    }

    #[test]
    fn test_opacity_normalization() {
        for prompt in ["set opacity to 50", "set opacity to 0.5"] {
            let changes = interpret(prompt);
            assert_eq!(changes.style.get("opacity").map(String::as_str), Some("0.5"));
        }
    }

    #[test]
    fn test_flex_invariant_holds() {
        for prompt in [
            "justify content space between",
            "align items to the end",
            "center it",
            "put items side by side and justify center",
        ] {
            let changes = interpret(prompt);
            if changes.style.contains_key("justifyContent") || changes.style.contains_key("alignItems") {
                assert!(changes.style.contains_key("display"), "prompt: {}", prompt);
            }
        }
    }

    #[test]
    fn test_unknown_prompt_is_empty() {
        assert!(interpret("do the thing with the stuff").is_empty());
        assert!(interpret("").is_empty());
    }

    #[test]
    fn test_apply_single_rule() {
        let interpreter = PatternInterpreter::new();
        let ctx = InterpretContext::default();
        let changes = interpreter.apply_rule("padding", "padding 12", &ctx).unwrap();
        assert_eq!(changes.style.get("padding").map(String::as_str), Some("12px"));
        assert!(interpreter.apply_rule("padding", "make it red", &ctx).is_none());
        assert!(interpreter.apply_rule("no-such-rule", "padding 12", &ctx).is_none());
    }
}
