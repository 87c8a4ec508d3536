//! Project document exchanged with the project store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::node::{ComponentNode, Page};
use crate::tree::ComponentTree;

/// Pages plus the flat component list of one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub components: Vec<ComponentNode>,
}

impl ProjectDocument {
    /// Parse and validate a project document.
    pub fn from_json_str(content: &str) -> ModelResult<Self> {
        let document: Self = serde_json::from_str(content)?;
        document.validate()?;
        Ok(document)
    }

    /// Page ids must be unique and the component tree well formed.
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen = HashSet::new();
        for page in &self.pages {
            if page.id.trim().is_empty() {
                return Err(ModelError::InvalidDocument(format!(
                    "page '{}' has an empty id",
                    page.name
                )));
            }
            if !seen.insert(page.id.as_str()) {
                return Err(ModelError::InvalidDocument(format!(
                    "duplicate page id '{}'",
                    page.id
                )));
            }
        }
        ComponentTree::new(self.components.clone()).map(|_| ())
    }

    /// Build the validated component tree.
    pub fn tree(&self) -> ModelResult<ComponentTree> {
        ComponentTree::new(self.components.clone())
    }

    /// Id of the page that owns unassigned components.
    pub fn first_page_id(&self) -> Option<&str> {
        self.pages.first().map(|p| p.id.as_str())
    }
}
