//! Static lookup tables: named colors, unit defaults and CSS key casing.

/// Named colors recognized in prompts, mapped to their hex value.
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#ff0000"),
    ("blue", "#0000ff"),
    ("green", "#008000"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("brown", "#a52a2a"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("lime", "#00ff00"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("indigo", "#4b0082"),
    ("violet", "#ee82ee"),
    ("beige", "#f5f5dc"),
    ("coral", "#ff7f50"),
    ("salmon", "#fa8072"),
    ("turquoise", "#40e0d0"),
    ("crimson", "#dc143c"),
    ("lavender", "#e6e6fa"),
    ("lightblue", "#add8e6"),
    ("darkblue", "#00008b"),
    ("lightgray", "#d3d3d3"),
    ("lightgrey", "#d3d3d3"),
    ("darkgray", "#a9a9a9"),
    ("darkgrey", "#a9a9a9"),
    ("lightgreen", "#90ee90"),
    ("darkgreen", "#006400"),
    ("transparent", "transparent"),
];

/// camelCase CSS properties accepted from free-text scraping.
pub const KNOWN_STYLE_KEYS: &[&str] = &[
    "alignItems",
    "alignSelf",
    "background",
    "backgroundColor",
    "backgroundImage",
    "border",
    "borderColor",
    "borderRadius",
    "borderWidth",
    "borderStyle",
    "bottom",
    "boxShadow",
    "color",
    "cursor",
    "display",
    "flex",
    "flexDirection",
    "flexWrap",
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "gap",
    "gridTemplateColumns",
    "height",
    "justifyContent",
    "left",
    "letterSpacing",
    "lineHeight",
    "margin",
    "marginBottom",
    "marginLeft",
    "marginRight",
    "marginTop",
    "maxHeight",
    "maxWidth",
    "minHeight",
    "minWidth",
    "opacity",
    "overflow",
    "padding",
    "paddingBottom",
    "paddingLeft",
    "paddingRight",
    "paddingTop",
    "position",
    "right",
    "textAlign",
    "textDecoration",
    "textTransform",
    "top",
    "transform",
    "transition",
    "visibility",
    "width",
    "zIndex",
];

/// Normalize a color word into a CSS color value.
///
/// Named colors resolve through [`NAMED_COLORS`] (case-insensitively, spaces
/// ignored so "light blue" works). Hex, `rgb()`, `rgba()`, `hsl()` and
/// `hsla()` values pass through unchanged. Anything else is not a color.
pub fn normalize_color(word: &str) -> Option<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('#') {
        let digits = &trimmed[1..];
        let valid = matches!(digits.len(), 3 | 4 | 6 | 8)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        return valid.then(|| trimmed.to_string());
    }

    let lower = trimmed.to_lowercase();
    if ["rgb(", "rgba(", "hsl(", "hsla("]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return Some(trimmed.to_string());
    }

    let key: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, hex)| hex.to_string())
}

/// Append `unit` to a bare number; values that already carry a unit (or are
/// keywords like `auto`) are returned unchanged.
pub fn with_default_unit(value: &str, unit: &str) -> String {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
        format!("{}{}", trimmed, unit)
    } else {
        trimmed.to_string()
    }
}

/// Convert a camelCase style key to its kebab-case CSS property name.
pub fn camel_to_kebab(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a kebab-case CSS property name to a camelCase style key.
pub fn kebab_to_camel(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.trim().chars() {
        if c == '-' || c == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Whether `key` is a camelCase CSS property we recognize.
pub fn is_known_style_key(key: &str) -> bool {
    KNOWN_STYLE_KEYS.contains(&key)
}
