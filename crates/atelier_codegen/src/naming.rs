//! Identifier and file-name derivation.

use std::collections::HashSet;

use atelier_model::Page;

/// Prefix of every generated component class.
pub const CLASS_PREFIX: &str = "component-";

/// Replace spaces, underscores and dots with dashes.
///
/// Ids that differ only in those characters collide after sanitizing.
pub fn sanitize_id(id: &str) -> String {
    id.replace([' ', '_', '.'], "-")
}

/// CSS class owned by the component with this id.
pub fn component_class(id: &str) -> String {
    format!("{}{}", CLASS_PREFIX, sanitize_id(id))
}

/// Convert to PascalCase, dropping characters that cannot appear in a JS
/// identifier.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

/// Base file name for a page: `About Us` becomes `AboutUsPage`.
pub fn page_base_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let stem = match pascal.strip_suffix("Page") {
        Some(stem) => stem.to_string(),
        None => pascal.clone(),
    };
    let stem = if stem.is_empty() {
        "Untitled".to_string()
    } else if stem.starts_with(|c: char| c.is_ascii_digit()) {
        format!("P{}", stem)
    } else {
        stem
    };
    format!("{}Page", stem)
}

/// Base names for every page, in page order. Later pages whose name maps to
/// an already taken base name get a numeric suffix.
pub fn assign_base_names(pages: &[Page]) -> Vec<String> {
    let mut taken = HashSet::new();
    pages
        .iter()
        .map(|page| {
            let base = page_base_name(&page.name);
            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}
