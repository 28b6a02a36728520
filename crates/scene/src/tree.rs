use std::fmt;

use foundation::arena::Arena;
use tracing::warn;

use crate::node::{ElementKind, NodeId, SceneNode, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    MissingNode(NodeId),
    CyclicAppend { parent: NodeId, child: NodeId },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::MissingNode(id) => write!(f, "scene node {id} does not exist"),
            SceneError::CyclicAppend { parent, child } => {
                write!(f, "cannot append {child} under its own descendant {parent}")
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Arena of retained scene nodes.
///
/// `revision` counts observable changes only: structural edits and writes
/// that actually change an attribute, class, text or binding. Writing the
/// value a node already has leaves it untouched.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: Arena<SceneNode>,
    revision: u64,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node.
    pub fn create(&mut self, kind: ElementKind) -> NodeId {
        self.revision += 1;
        NodeId(self.nodes.insert(SceneNode::new(kind)))
    }

    /// Creates a node and appends it as the last child of `parent`.
    pub fn append_new(&mut self, parent: NodeId, kind: ElementKind) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        let child = self.create(kind);
        self.append(parent, child)?;
        Ok(child)
    }

    /// Moves `child` to the end of `parent`'s children, detaching it from
    /// its previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::MissingNode(child));
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(SceneError::CyclicAppend { parent, child });
            }
            cursor = self.node(id).and_then(SceneNode::parent);
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        self.revision += 1;
        Ok(())
    }

    /// Detaches `id` and frees it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::MissingNode(id));
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next.0) {
                stack.extend(node.children);
            }
        }
        self.revision += 1;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(SceneNode::children).unwrap_or(&[])
    }

    /// Direct children of `parent` matching `selector`, in document order.
    pub fn select(&self, parent: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.node(child).is_some_and(|n| selector.matches(n)))
            .collect()
    }

    /// Write access to one node. Writes through a stale id are ignored.
    pub fn element(&mut self, id: NodeId) -> ElementMut<'_> {
        let SceneTree { nodes, revision } = self;
        let node = nodes.get_mut(id.0);
        if node.is_none() {
            warn!(node = %id, "ignoring writes to a scene node that no longer exists");
        }
        ElementMut { node, revision }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn bind(&mut self, id: NodeId, index: usize) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            if node.bound_index != Some(index) {
                node.bound_index = Some(index);
                self.revision += 1;
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.retain(|&c| c != id);
        }
    }
}

/// Chainable attribute writer for a single node.
pub struct ElementMut<'a> {
    node: Option<&'a mut SceneNode>,
    revision: &'a mut u64,
}

impl ElementMut<'_> {
    pub fn is_live(&self) -> bool {
        self.node.is_some()
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        if let Some(node) = self.node.as_deref_mut() {
            let value = value.to_string();
            if node.attributes.get(name) != Some(&value) {
                node.attributes.insert(name.to_string(), value);
                *self.revision += 1;
            }
        }
        self
    }

    pub fn remove_attr(mut self, name: &str) -> Self {
        if let Some(node) = self.node.as_deref_mut() {
            if node.attributes.remove(name).is_some() {
                *self.revision += 1;
            }
        }
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        if let Some(node) = self.node.as_deref_mut() {
            if node.class.as_deref() != Some(class) {
                node.class = Some(class.to_string());
                *self.revision += 1;
            }
        }
        self
    }

    pub fn text(mut self, text: impl ToString) -> Self {
        if let Some(node) = self.node.as_deref_mut() {
            let text = text.to_string();
            if node.text.as_deref() != Some(text.as_str()) {
                node.text = Some(text);
                *self.revision += 1;
            }
        }
        self
    }
}
