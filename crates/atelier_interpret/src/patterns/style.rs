//! Plain style probes. Each one contributes at most one key (centering is
//! the exception and sets a small bundle); all of them run.

use atelier_model::Changes;
use lazy_static::lazy_static;
use regex::Regex;

use super::values::{
    dimension, extract_background, extract_height, extract_text_color, extract_width,
    first_color_word, format_number, last_color_word, mentions_text,
};
use super::{InterpretContext, Prompt, Rule, RuleGroup};

pub(super) const RULES: &[Rule] = &[
    Rule::new("background", RuleGroup::Style, background),
    Rule::new("text-color", RuleGroup::Style, text_color),
    Rule::new("width", RuleGroup::Style, width),
    Rule::new("height", RuleGroup::Style, height),
    Rule::new("font-size", RuleGroup::Style, font_size),
    Rule::new("padding", RuleGroup::Style, padding),
    Rule::new("margin", RuleGroup::Style, margin),
    Rule::new("border-radius", RuleGroup::Style, border_radius),
    Rule::new("text-align", RuleGroup::Style, text_align),
    Rule::new("display", RuleGroup::Style, display),
    Rule::new("flex-direction", RuleGroup::Style, flex_direction),
    Rule::new("centering", RuleGroup::Style, centering),
    Rule::new("justify-content", RuleGroup::Style, justify_content),
    Rule::new("align-items", RuleGroup::Style, align_items),
    Rule::new("opacity", RuleGroup::Style, opacity),
    Rule::new("font-weight", RuleGroup::Style, font_weight),
    Rule::new("border", RuleGroup::Style, border),
    Rule::new("bare-color", RuleGroup::Style, bare_color),
];

const UNIT: &str = r"(px|pixels?|%|percent|em|rem|vw|vh|pt)?";

lazy_static! {
    static ref FONT_SIZE: Regex = Regex::new(&format!(
        r"\b(?:font[\s-]?size|text[\s-]size|size\s+of\s+(?:the\s+)?(?:text|font))\s*(?:to|=|:|of|is|at)?\s*(\d+(?:\.\d+)?)\s*{}",
        UNIT
    ))
    .unwrap();
    static ref FONT_SIZE_BEFORE: Regex =
        Regex::new(r"\b(\d+(?:\.\d+)?)\s*(px|pt|em|rem)\s+(?:text|font)\b").unwrap();
    static ref BIGGER: Regex = Regex::new(r"\b(?:bigger|larger|increase\s+(?:the\s+)?(?:font|text))\b").unwrap();
    static ref SMALLER: Regex = Regex::new(r"\b(?:smaller|tiny|decrease\s+(?:the\s+)?(?:font|text))\b").unwrap();
    static ref PADDING: Regex = Regex::new(&format!(
        r"\bpadding\s*(?:to|=|:|of|is|by)?\s*(\d+(?:\.\d+)?)\s*{}",
        UNIT
    ))
    .unwrap();
    static ref NO_PADDING: Regex = Regex::new(r"\b(?:no|remove(?:\s+the)?|zero)\s+padding\b").unwrap();
    static ref MORE_PADDING: Regex = Regex::new(r"\b(?:add|more|some|extra)\s+(?:some\s+)?padding\b").unwrap();
    static ref LESS_PADDING: Regex = Regex::new(r"\b(?:less|reduce(?:\s+the)?)\s+padding\b").unwrap();
    static ref MARGIN: Regex = Regex::new(&format!(
        r"\bmargin\s*(?:to|=|:|of|is|by)?\s*(\d+(?:\.\d+)?)\s*{}",
        UNIT
    ))
    .unwrap();
    static ref NO_MARGIN: Regex = Regex::new(r"\b(?:no|remove(?:\s+the)?|zero)\s+margins?\b").unwrap();
    static ref MORE_MARGIN: Regex = Regex::new(r"\b(?:add|more|some|extra)\s+(?:some\s+)?margins?\b").unwrap();
    static ref LESS_MARGIN: Regex = Regex::new(r"\b(?:less|reduce(?:\s+the)?)\s+margins?\b").unwrap();
    static ref RADIUS: Regex = Regex::new(
        r"\b(?:border[\s-]?radius|corner[\s-]radius|radius|rounded(?:\s+corners?)?|round(?:ed)?\s+corners?|corners?)\s*(?:to|=|:|of|by|at)?\s*(\d+(?:\.\d+)?)\s*(px|%|em|rem)?"
    )
    .unwrap();
    static ref SQUARE: Regex = Regex::new(r"\b(?:square|sharp)\s+corners?\b|\bno\s+(?:border[\s-])?radius\b").unwrap();
    static ref CIRCLE: Regex = Regex::new(r"\b(?:circle|circular)\b").unwrap();
    static ref PILL: Regex = Regex::new(r"\bpill\b").unwrap();
    static ref ROUNDED: Regex = Regex::new(r"\b(?:rounded|round\s+(?:the\s+)?corners?)\b").unwrap();
    static ref TEXT_ALIGN: Vec<Regex> = vec![
        Regex::new(r"\btext[\s-]align(?:ment)?\s*(?:to|=|:)?\s*(?:the\s+)?(left|right|center|centre|justify)\b").unwrap(),
        Regex::new(r"\b(?:align|justify|move)\s+(?:the\s+)?text\s+(?:to\s+(?:the\s+)?)?(left|right|center|centre)\b").unwrap(),
        Regex::new(r"\b(left|right)[\s-]align(?:ed)?\b").unwrap(),
        Regex::new(r"\b(cent(?:er|re))\s+(?:the\s+)?text\b").unwrap(),
        Regex::new(r"\btext\s+(?:to\s+the\s+)?(left|right)\b").unwrap(),
    ];
    static ref DISPLAY: Regex = Regex::new(
        r"\bdisplay\s*(?:to|=|:|as)?\s*(flex|grid|block|inline-block|inline|none)\b"
    )
    .unwrap();
    static ref AS_GRID: Regex = Regex::new(r"\b(?:as|into)\s+an?\s+grid\b|\bgrid\s+layout\b").unwrap();
    static ref HIDE: Regex = Regex::new(r"\b(?:hide|hidden|invisible)\b").unwrap();
    static ref UNHIDE: Regex = Regex::new(r"\b(?:unhide|show\s+it|make\s+(?:it\s+)?visible)\b").unwrap();
    static ref FLEX_DIRECTION: Regex = Regex::new(
        r"\bflex[\s-]direction\s*(?:to|=|:)?\s*(row-reverse|column-reverse|row|column)\b"
    )
    .unwrap();
    static ref ROW: Regex = Regex::new(
        r"\b(?:side\s+by\s+side|arrange\s+(?:\w+\s+)?horizontally|in\s+a\s+row|next\s+to\s+each\s+other|horizontal\s+layout)\b"
    )
    .unwrap();
    static ref COLUMN: Regex = Regex::new(
        r"\b(?:stack(?:ed)?|arrange\s+(?:\w+\s+)?vertically|in\s+a\s+column|one\s+below\s+(?:the\s+)?other|on\s+top\s+of\s+each\s+other|vertical\s+layout)\b"
    )
    .unwrap();
    static ref CENTER: Regex = Regex::new(r"\bcent(?:er|re)(?:ed|ing|s)?\b").unwrap();
    static ref SCREEN: Regex = Regex::new(r"\b(?:screen|viewport|page|window)\b").unwrap();
    static ref JUSTIFY: Regex = Regex::new(
        r"\bjustify(?:[\s-]content)?\s*(?:to|=|:)?\s*(?:the\s+)?(?:items\s+)?(center|flex-start|flex-end|start|end|space[\s-]between|space[\s-]around|space[\s-]evenly|left|right)\b"
    )
    .unwrap();
    static ref SPACE_BETWEEN: Regex = Regex::new(r"\bspace[\s-](between|around|evenly)\b").unwrap();
    static ref ALIGN_ITEMS: Regex = Regex::new(
        r"\balign[\s-]items\s*(?:to|=|:)?\s*(?:the\s+)?(center|flex-start|flex-end|start|end|stretch|baseline|top|bottom)\b"
    )
    .unwrap();
    static ref OPACITY: Regex = Regex::new(
        r"\b(?:opacity|transparency)\s*(?:to|=|:|of|at|is)?\s*(\d+(?:\.\d+)?)\s*(%|percent)?"
    )
    .unwrap();
    static ref HALF_TRANSPARENT: Regex =
        Regex::new(r"\b(?:semi[\s-]?transparent|half[\s-]transparent|see[\s-]through)\b").unwrap();
    static ref FONT_WEIGHT: Regex = Regex::new(
        r"\b(?:font[\s-]weight|weight)\s*(?:to|=|:|of|is)?\s*(\d{3}|bold|bolder|normal|lighter)\b"
    )
    .unwrap();
    static ref NOT_BOLD: Regex =
        Regex::new(r"\b(?:not\s+bold|unbold|no\s+bold|normal\s+weight|regular\s+weight)\b").unwrap();
    static ref BOLD: Regex = Regex::new(r"\b(?:bold|bolder|heavy\s+text)\b").unwrap();
    static ref LIGHT: Regex = Regex::new(r"\b(?:light|thin)\s+(?:text|font|weight)\b").unwrap();
    static ref BORDER_WORD: Regex = Regex::new(r"\bborder\b").unwrap();
    static ref NO_BORDER: Regex =
        Regex::new(r"\b(?:no|remove(?:\s+the)?|without(?:\s+an?)?)\s+border\b|\bborderless\b").unwrap();
    static ref BORDER_WIDTH: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*(?:px|pixels?)?\s+(?:\w+\s+)?(?:\w+\s+)?border\b|\bborder\s*(?:of|width)?\s*(\d+(?:\.\d+)?)\s*(?:px|pixels?)?").unwrap();
    static ref BORDER_STYLE: Regex = Regex::new(r"\b(solid|dashed|dotted|double|groove|ridge)\b").unwrap();
    static ref CLAUSE_BREAK: Regex = Regex::new(r"\s+and\s+|,|;").unwrap();
}

fn set_dimension(changes: &mut Changes, key: &str, caps: &regex::Captures<'_>) {
    changes.set_style(key, dimension(&caps[1], caps.get(2).map(|m| m.as_str())));
}

fn background(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match extract_background(prompt.lower()) {
        Some(color) => {
            changes.set_style("backgroundColor", color);
            true
        }
        None => false,
    }
}

fn text_color(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match extract_text_color(prompt.lower()) {
        Some(color) => {
            changes.set_style("color", color);
            true
        }
        None => false,
    }
}

fn width(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match extract_width(prompt.lower()) {
        Some(value) => {
            changes.set_style("width", value);
            true
        }
        None => false,
    }
}

fn height(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    match extract_height(prompt.lower()) {
        Some(value) => {
            changes.set_style("height", value);
            true
        }
        None => false,
    }
}

fn font_size(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    if let Some(caps) = FONT_SIZE.captures(lower).or_else(|| FONT_SIZE_BEFORE.captures(lower)) {
        set_dimension(changes, "fontSize", &caps);
    } else if BIGGER.is_match(lower) {
        changes.set_style("fontSize", "24px");
    } else if SMALLER.is_match(lower) {
        changes.set_style("fontSize", "12px");
    } else {
        return false;
    }
    true
}

fn spacing(
    lower: &str,
    changes: &mut Changes,
    key: &str,
    exact: &Regex,
    none: &Regex,
    more: &Regex,
    less: &Regex,
) -> bool {
    if let Some(caps) = exact.captures(lower) {
        set_dimension(changes, key, &caps);
    } else if none.is_match(lower) {
        changes.set_style(key, "0");
    } else if less.is_match(lower) {
        changes.set_style(key, "4px");
    } else if more.is_match(lower) {
        changes.set_style(key, "16px");
    } else {
        return false;
    }
    true
}

fn padding(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    spacing(
        prompt.lower(),
        changes,
        "padding",
        &PADDING,
        &NO_PADDING,
        &MORE_PADDING,
        &LESS_PADDING,
    )
}

fn margin(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    spacing(
        prompt.lower(),
        changes,
        "margin",
        &MARGIN,
        &NO_MARGIN,
        &MORE_MARGIN,
        &LESS_MARGIN,
    )
}

fn border_radius(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    if let Some(caps) = RADIUS.captures(lower) {
        set_dimension(changes, "borderRadius", &caps);
    } else if SQUARE.is_match(lower) {
        changes.set_style("borderRadius", "0");
    } else if CIRCLE.is_match(lower) {
        changes.set_style("borderRadius", "50%");
    } else if PILL.is_match(lower) {
        changes.set_style("borderRadius", "9999px");
    } else if ROUNDED.is_match(lower) {
        changes.set_style("borderRadius", "8px");
    } else {
        return false;
    }
    true
}

fn text_align(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let value = TEXT_ALIGN
        .iter()
        .find_map(|re| re.captures(prompt.lower()))
        .map(|caps| match &caps[1] {
            "centre" => "center".to_string(),
            other => other.to_string(),
        });
    match value {
        Some(value) => {
            changes.set_style("textAlign", value);
            true
        }
        None => false,
    }
}

fn display(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let value = if let Some(caps) = DISPLAY.captures(lower) {
        caps[1].to_string()
    } else if AS_GRID.is_match(lower) {
        "grid".to_string()
    } else if UNHIDE.is_match(lower) {
        "block".to_string()
    } else if HIDE.is_match(lower) {
        "none".to_string()
    } else {
        return false;
    };
    changes.set_style("display", value);
    true
}

fn flex_direction(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let value = if let Some(caps) = FLEX_DIRECTION.captures(lower) {
        caps[1].to_string()
    } else if ROW.is_match(lower) {
        "row".to_string()
    } else if COLUMN.is_match(lower) {
        "column".to_string()
    } else {
        return false;
    };
    changes.set_style("flexDirection", value);
    changes
        .style
        .entry("display".to_string())
        .or_insert_with(|| "flex".to_string());
    true
}

fn centering(prompt: &Prompt, ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    if !CENTER.is_match(lower)
        || changes.style.contains_key("textAlign")
        || JUSTIFY.is_match(lower)
        || ALIGN_ITEMS.is_match(lower)
    {
        return false;
    }

    changes
        .style
        .entry("display".to_string())
        .or_insert_with(|| "flex".to_string());
    changes.set_style("justifyContent", "center");
    changes.set_style("alignItems", "center");

    if SCREEN.is_match(lower) {
        changes.set_style("minHeight", "100vh");
        changes
            .style
            .entry("height".to_string())
            .or_insert_with(|| "100vh".to_string());
    } else if !ctx.has_height() && !changes.style.contains_key("height") {
        changes.set_style("minHeight", "100%");
    }
    true
}

fn flex_keyword(word: &str) -> String {
    match word {
        "start" | "left" | "top" => "flex-start".to_string(),
        "end" | "right" | "bottom" => "flex-end".to_string(),
        other => other.replace(' ', "-"),
    }
}

fn justify_content(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let value = JUSTIFY
        .captures(lower)
        .map(|caps| flex_keyword(&caps[1]))
        .or_else(|| {
            SPACE_BETWEEN
                .captures(lower)
                .map(|caps| format!("space-{}", &caps[1]))
        });
    match value {
        Some(value) => {
            changes.set_style("justifyContent", value);
            true
        }
        None => false,
    }
}

fn align_items(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    if changes.style.contains_key("alignItems") {
        return false;
    }
    match ALIGN_ITEMS.captures(prompt.lower()) {
        Some(caps) => {
            changes.set_style("alignItems", flex_keyword(&caps[1]));
            true
        }
        None => false,
    }
}

/// Opacity as a 0..1 string; values above 1 are read as percentages.
pub fn normalize_opacity(raw: &str) -> Option<String> {
    let value: f64 = raw.parse().ok()?;
    let value = if value > 1.0 { value / 100.0 } else { value };
    Some(format_number(value.clamp(0.0, 1.0)))
}

fn opacity(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let value = match OPACITY.captures(lower) {
        Some(caps) => normalize_opacity(&caps[1]),
        None if HALF_TRANSPARENT.is_match(lower) => Some("0.5".to_string()),
        None => None,
    };
    match value {
        Some(value) => {
            changes.set_style("opacity", value);
            true
        }
        None => false,
    }
}

fn font_weight(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();
    let value = if let Some(caps) = FONT_WEIGHT.captures(lower) {
        caps[1].to_string()
    } else if NOT_BOLD.is_match(lower) {
        "normal".to_string()
    } else if BOLD.is_match(lower) {
        "bold".to_string()
    } else if LIGHT.is_match(lower) {
        "300".to_string()
    } else {
        return false;
    };
    changes.set_style("fontWeight", value);
    true
}

/// Clause text before and after `start..end`, split at "and", commas and
/// semicolons.
fn clause_bounds(lower: &str, start: usize, end: usize) -> (&str, &str) {
    let before_start = CLAUSE_BREAK
        .find_iter(&lower[..start])
        .last()
        .map_or(0, |m| m.end());
    let after_end = CLAUSE_BREAK
        .find(&lower[end..])
        .map_or(lower.len(), |m| end + m.start());
    (&lower[before_start..start], &lower[end..after_end])
}

fn border(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    let lower = prompt.lower();

    // "border radius" belongs to the radius probe.
    let Some(word) = BORDER_WORD.find_iter(lower).find(|m| {
        let rest = lower[m.end()..].trim_start_matches([' ', '-']);
        !rest.starts_with("radius")
    }) else {
        return false;
    };

    if NO_BORDER.is_match(lower) {
        changes.set_style("border", "none");
        return true;
    }

    let width = BORDER_WIDTH
        .captures(lower)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| format!("{}px", m.as_str()))
        .unwrap_or_else(|| "1px".to_string());
    let style = BORDER_STYLE
        .captures(lower)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "solid".to_string());
    let (before, after) = clause_bounds(lower, word.start(), word.end());
    let color = first_color_word(after)
        .or_else(|| last_color_word(before))
        .unwrap_or_else(|| "#000000".to_string());

    changes.set_style("border", format!("{} {} {}", width, style, color));
    true
}

fn bare_color(prompt: &Prompt, _ctx: &InterpretContext<'_>, changes: &mut Changes) -> bool {
    if ["backgroundColor", "color", "border", "opacity"]
        .iter()
        .any(|k| changes.style.contains_key(*k))
    {
        return false;
    }
    // Colors named inside text content are content, not style.
    if let Some(props) = &changes.props {
        if ["children", "placeholder", "alt"].iter().any(|k| props.contains_key(*k)) {
            return false;
        }
    }

    let lower = prompt.lower();
    let Some(color) = first_color_word(lower) else {
        return false;
    };
    if mentions_text(lower) {
        changes.set_style("color", color);
    } else {
        changes.set_style("backgroundColor", color);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of(prompt: &str) -> atelier_model::StyleMap {
        let prompt = Prompt::new(prompt);
        let ctx = InterpretContext::default();
        let mut changes = Changes::default();
        for rule in RULES {
            (rule.extract)(&prompt, &ctx, &mut changes);
        }
        changes.style
    }

    fn get(style: &atelier_model::StyleMap, key: &str) -> Option<String> {
        style.get(key).cloned()
    }

    #[test]
    fn test_font_size() {
        assert_eq!(get(&style_of("font size 18"), "fontSize").as_deref(), Some("18px"));
        assert_eq!(get(&style_of("use 2em text"), "fontSize").as_deref(), Some("2em"));
        assert_eq!(get(&style_of("make the text bigger"), "fontSize").as_deref(), Some("24px"));
        assert_eq!(get(&style_of("smaller please"), "fontSize").as_deref(), Some("12px"));
    }

    #[test]
    fn test_spacing() {
        assert_eq!(get(&style_of("padding 20"), "padding").as_deref(), Some("20px"));
        assert_eq!(get(&style_of("add some padding"), "padding").as_deref(), Some("16px"));
        assert_eq!(get(&style_of("remove the margin"), "margin").as_deref(), Some("0"));
        assert_eq!(get(&style_of("margin of 2rem"), "margin").as_deref(), Some("2rem"));
    }

    #[test]
    fn test_radius() {
        assert_eq!(get(&style_of("rounded corners"), "borderRadius").as_deref(), Some("8px"));
        assert_eq!(get(&style_of("border radius 12"), "borderRadius").as_deref(), Some("12px"));
        assert_eq!(get(&style_of("make it a circle"), "borderRadius").as_deref(), Some("50%"));
        // radius is not a border
        assert!(get(&style_of("border radius 12"), "border").is_none());
    }

    #[test]
    fn test_text_align_blocks_centering() {
        let style = style_of("center the text");
        assert_eq!(get(&style, "textAlign").as_deref(), Some("center"));
        assert!(!style.contains_key("justifyContent"));
    }

    #[test]
    fn test_display_and_direction() {
        assert_eq!(get(&style_of("hide it"), "display").as_deref(), Some("none"));
        assert_eq!(get(&style_of("unhide it"), "display").as_deref(), Some("block"));

        let style = style_of("put them side by side");
        assert_eq!(get(&style, "flexDirection").as_deref(), Some("row"));
        assert_eq!(get(&style, "display").as_deref(), Some("flex"));

        let style = style_of("stack the items");
        assert_eq!(get(&style, "flexDirection").as_deref(), Some("column"));
    }

    #[test]
    fn test_justify_and_align() {
        let style = style_of("justify content space between");
        assert_eq!(get(&style, "justifyContent").as_deref(), Some("space-between"));
        assert!(!style.contains_key("alignItems"));

        let style = style_of("align items to the bottom");
        assert_eq!(get(&style, "alignItems").as_deref(), Some("flex-end"));
    }

    #[test]
    fn test_opacity() {
        assert_eq!(normalize_opacity("50").as_deref(), Some("0.5"));
        assert_eq!(normalize_opacity("0.5").as_deref(), Some("0.5"));
        assert_eq!(normalize_opacity("1").as_deref(), Some("1"));
        assert_eq!(get(&style_of("make it semi-transparent"), "opacity").as_deref(), Some("0.5"));
        assert!(!style_of("make it semi-transparent").contains_key("backgroundColor"));
    }

    #[test]
    fn test_font_weight() {
        assert_eq!(get(&style_of("make it bold"), "fontWeight").as_deref(), Some("bold"));
        assert_eq!(get(&style_of("font weight 600"), "fontWeight").as_deref(), Some("600"));
        assert_eq!(get(&style_of("not bold anymore"), "fontWeight").as_deref(), Some("normal"));
    }

    #[test]
    fn test_border() {
        assert_eq!(
            get(&style_of("add a red border"), "border").as_deref(),
            Some("1px solid #ff0000")
        );
        assert_eq!(
            get(&style_of("2px dashed border in blue"), "border").as_deref(),
            Some("2px dashed #0000ff")
        );
        assert_eq!(get(&style_of("remove the border"), "border").as_deref(), Some("none"));

        let style = style_of("blue background and a red border");
        assert_eq!(get(&style, "backgroundColor").as_deref(), Some("#0000ff"));
        assert_eq!(get(&style, "border").as_deref(), Some("1px solid #ff0000"));
    }

    #[test]
    fn test_bare_color() {
        let style = style_of("make it green");
        assert_eq!(get(&style, "backgroundColor").as_deref(), Some("#008000"));

        let style = style_of("green title");
        assert_eq!(get(&style, "color").as_deref(), Some("#008000"));
        assert!(!style.contains_key("backgroundColor"));
    }
}
