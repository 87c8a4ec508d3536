//! # atelier_model
//!
//! Data model shared by the Atelier interpreter and code generator.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - **Lexicon**: named colors, unit defaults and CSS key conversions
//! - **Changes**: the patch produced by interpreting an edit request
//! - **Nodes and pages**: the generic component tree built in the canvas editor
//! - **Tree**: validated parent/child access with cycle rejection
//!
//! ## Example
//!
//! ```rust
//! use atelier_model::{Changes, ComponentNode, ComponentTree};
//!
//! let mut tree = ComponentTree::new(vec![ComponentNode::new("hero", "div")]).unwrap();
//!
//! let mut changes = Changes::default();
//! changes.style.insert("justifyContent".to_string(), "center".to_string());
//! changes.ensure_flex_display();
//!
//! tree.apply_changes("hero", &changes).unwrap();
//! assert_eq!(tree.get("hero").unwrap().style().get("display").map(String::as_str), Some("flex"));
//! ```

pub mod changes;
pub mod error;
pub mod lexicon;
pub mod node;
pub mod project;
pub mod tree;

pub use changes::{style_from_value, style_value_to_string, Changes, PropMap, StyleMap};
pub use error::{ModelError, ModelResult};
pub use lexicon::{
    camel_to_kebab, is_known_style_key, kebab_to_camel, normalize_color, with_default_unit,
    KNOWN_STYLE_KEYS, NAMED_COLORS,
};
pub use node::{slugify, ComponentNode, InlineChild, InlineChildren, Page};
pub use project::ProjectDocument;
pub use tree::{ComponentTree, MAX_RENDER_DEPTH};
