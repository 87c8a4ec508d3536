//! Component tree access and mutation.
//!
//! Links are validated when they are made: [`ComponentTree::new`],
//! [`ComponentTree::insert`] and [`ComponentTree::set_parent`] reject
//! `parentId` cycles. Walks still stop at [`MAX_RENDER_DEPTH`] so that a tree
//! built with [`ComponentTree::unchecked`] can never recurse forever.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::changes::{style_from_value, Changes};
use crate::error::{ModelError, ModelResult};
use crate::node::ComponentNode;

/// Hard cap on tree depth for recursive walks.
pub const MAX_RENDER_DEPTH: usize = 50;

/// Flat node list with an id index.
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    nodes: Vec<ComponentNode>,
    index: HashMap<String, usize>,
}

impl ComponentTree {
    /// Build a tree, rejecting duplicate ids and parent cycles.
    ///
    /// Parents that do not exist are tolerated; such nodes are reported by
    /// [`ComponentTree::detached`].
    pub fn new(nodes: Vec<ComponentNode>) -> ModelResult<Self> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(ModelError::DuplicateId(node.id.clone()));
            }
        }

        let tree = Self::unchecked(nodes);
        tree.validate()?;
        Ok(tree)
    }

    /// Build a tree without validation. Later duplicates of an id are dropped.
    pub fn unchecked(nodes: Vec<ComponentNode>) -> Self {
        let mut tree = Self::default();
        for node in nodes {
            if tree.index.contains_key(&node.id) {
                warn!("Dropping duplicate component id {}", node.id);
                continue;
            }
            tree.index.insert(node.id.clone(), tree.nodes.len());
            tree.nodes.push(node);
        }
        tree
    }

    /// Check every parent chain for cycles.
    pub fn validate(&self) -> ModelResult<()> {
        for node in &self.nodes {
            let mut visited = HashSet::new();
            visited.insert(node.id.as_str());
            let mut current = node.parent_id.as_deref();
            while let Some(parent) = current {
                if !visited.insert(parent) {
                    return Err(ModelError::Cycle {
                        node: node.id.clone(),
                        parent: node.parent_id.clone().unwrap_or_default(),
                    });
                }
                current = self.get(parent).and_then(|p| p.parent_id.as_deref());
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ComponentNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<ComponentNode> {
        self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&ComponentNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes with no parent.
    pub fn roots(&self) -> Vec<&ComponentNode> {
        self.nodes.iter().filter(|n| n.parent_id.is_none()).collect()
    }

    /// Nodes whose parent id points at a node that does not exist.
    pub fn detached(&self) -> Vec<&ComponentNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.parent_id.as_deref(), Some(p) if !self.contains(p)))
            .collect()
    }

    /// Tree-edge children of `id`, in list order.
    pub fn children_of(&self, id: &str) -> Vec<&ComponentNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Nodes assigned to `page_id`. Nodes without a page belong to
    /// `default_page`.
    pub fn nodes_for_page(&self, page_id: &str, default_page: Option<&str>) -> Vec<&ComponentNode> {
        self.nodes
            .iter()
            .filter(|n| match n.page_id() {
                Some(assigned) => assigned == page_id,
                None => default_page == Some(page_id),
            })
            .collect()
    }

    /// Depth-first walk from `root_id`. Returns `false` if the depth cap cut
    /// the walk short.
    pub fn walk<F>(&self, root_id: &str, mut visit: F) -> bool
    where
        F: FnMut(&ComponentNode, usize),
    {
        match self.get(root_id) {
            Some(root) => self.walk_inner(root, 0, &mut visit),
            None => true,
        }
    }

    fn walk_inner<F>(&self, node: &ComponentNode, depth: usize, visit: &mut F) -> bool
    where
        F: FnMut(&ComponentNode, usize),
    {
        if depth > MAX_RENDER_DEPTH {
            warn!("Depth cap reached at component {}", node.id);
            return false;
        }
        visit(node, depth);
        let mut complete = true;
        for child in self.children_of(&node.id) {
            complete &= self.walk_inner(child, depth + 1, visit);
        }
        complete
    }

    /// Add a node, rejecting duplicate ids, unknown parents and self-links.
    pub fn insert(&mut self, node: ComponentNode) -> ModelResult<()> {
        if self.contains(&node.id) {
            return Err(ModelError::DuplicateId(node.id));
        }
        if let Some(parent) = node.parent_id.as_deref() {
            if parent == node.id {
                return Err(ModelError::Cycle {
                    node: node.id.clone(),
                    parent: parent.to_string(),
                });
            }
            if !self.contains(parent) {
                return Err(ModelError::UnknownParent {
                    node: node.id.clone(),
                    parent: parent.to_string(),
                });
            }
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Re-link `id` under `parent`, refusing links that would form a cycle.
    pub fn set_parent(&mut self, id: &str, parent: Option<&str>) -> ModelResult<()> {
        if !self.contains(id) {
            return Err(ModelError::NodeNotFound(id.to_string()));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(ModelError::UnknownParent {
                    node: id.to_string(),
                    parent: parent.to_string(),
                });
            }
            if self.is_ancestor_or_self(id, parent) {
                return Err(ModelError::Cycle {
                    node: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        let i = self.index[id];
        self.nodes[i].parent_id = parent.map(str::to_string);
        Ok(())
    }

    /// Whether `ancestor` is `node` or appears on `node`'s parent chain.
    fn is_ancestor_or_self(&self, ancestor: &str, node: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self.get(id).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    /// Apply a change patch to one node.
    ///
    /// Style and props are merged (re-applying a patch is a no-op), `type`
    /// and `customCSS` replace, `wrap_in` inserts a new parent and
    /// `create_modal` inserts the modal as a sibling of the target.
    pub fn apply_changes(&mut self, id: &str, changes: &Changes) -> ModelResult<()> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| ModelError::NodeNotFound(id.to_string()))?;

        {
            let node = &mut self.nodes[i];
            node.merge_style(&changes.style);
            if let Some(css) = &changes.custom_css {
                node.props
                    .insert("customCSS".to_string(), Value::String(css.clone()));
            }
            if let Some(component_type) = &changes.component_type {
                node.component_type = component_type.clone();
            }
            if let Some(props) = &changes.props {
                for (key, value) in props {
                    if key == "style" {
                        node.merge_style(&style_from_value(value));
                    } else {
                        node.props.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        if let Some(tag) = &changes.wrap_in {
            self.wrap(id, tag)?;
        }

        if let Some(modal) = &changes.create_modal {
            self.insert_sibling(id, modal.clone())?;
        }

        Ok(())
    }

    fn wrap(&mut self, id: &str, tag: &str) -> ModelResult<()> {
        let i = self.index[id];
        let target = &self.nodes[i];

        let base = format!("{}-wrap-{}", target.id, tag);
        let mut wrapper_id = base.clone();
        let mut n = 2;
        while self.contains(&wrapper_id) {
            wrapper_id = format!("{}-{}", base, n);
            n += 1;
        }

        let mut wrapper = ComponentNode::new(wrapper_id.clone(), tag);
        wrapper.parent_id = target.parent_id.clone();
        if let Some(page) = target.page_id() {
            wrapper
                .props
                .insert("pageId".to_string(), Value::String(page.to_string()));
        }

        debug!("Wrapping {} in <{}> as {}", id, tag, wrapper_id);
        self.nodes.insert(i, wrapper);
        self.nodes[i + 1].parent_id = Some(wrapper_id);
        self.reindex();
        Ok(())
    }

    fn insert_sibling(&mut self, id: &str, mut node: ComponentNode) -> ModelResult<()> {
        if self.contains(&node.id) {
            return Err(ModelError::DuplicateId(node.id));
        }
        let i = self.index[id];
        let target = &self.nodes[i];
        node.parent_id = target.parent_id.clone();
        if node.page_id().is_none() {
            if let Some(page) = target.page_id() {
                node.props
                    .insert("pageId".to_string(), Value::String(page.to_string()));
            }
        }

        debug!("Inserting {} next to {}", node.id, id);
        self.nodes.insert(i + 1, node);
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}
