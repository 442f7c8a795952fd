//! Document Tree Model
//!
//! Arena-backed ordered tree. Nodes own their child list; the parent link is a
//! plain [`NodeId`] so there are no reference cycles. All structural changes go
//! through [`PlanDocument`], which keeps the child list and the parent pointer
//! in sync on every insert, move, and removal.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::types::{MoveRejection, Node, NodeId, NodeKind, PlanError, Result};

// =============================================================================
// Document Interface
// =============================================================================

/// Structural interface the grouping engine uses to read and mutate a document
///
/// `index = None` appends; an index past the end of the child list also appends.
pub trait PlanDocument {
    /// Root of the whole document
    fn root(&self) -> NodeId;

    /// Look up a live node
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Insert a new node under `parent`
    fn insert_node(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        index: Option<usize>,
    ) -> Result<NodeId>;

    /// Reparent `node` (with its whole subtree) under `new_parent`
    ///
    /// `index` is interpreted after `node` has been detached from its old parent.
    fn move_node(&mut self, node: NodeId, new_parent: NodeId, index: Option<usize>) -> Result<()>;

    /// Remove `node` and its whole subtree
    fn remove_node(&mut self, node: NodeId) -> Result<()>;

    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Node::name)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Children of `id` in document order (empty for unknown nodes)
    fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children
    fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }
}

// =============================================================================
// Arena Tree
// =============================================================================

/// In-memory test-plan document
#[derive(Debug, Clone)]
pub struct PlanTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl PlanTree {
    /// Create a document containing only its root
    pub fn new(root_name: impl Into<String>, root_kind: NodeKind) -> Self {
        let root = NodeId::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(root, root_name, root_kind));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// Append a child; shorthand for `insert_node(parent, name, kind, None)`
    pub fn add(&mut self, parent: NodeId, name: impl AsRef<str>, kind: NodeKind) -> Result<NodeId> {
        self.insert_node(parent, name.as_ref(), kind, None)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes below `id` in depth-first document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First node (document order, root included) with the given display name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|id| self.name(*id) == Some(name))
    }

    /// Check whether `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Display names of the direct children of `id`
    pub fn child_names(&self, id: NodeId) -> Vec<&str> {
        self.children(id)
            .iter()
            .filter_map(|c| self.name(*c))
            .collect()
    }

    /// Indented outline of the whole document
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(self.root, 0, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let _ = writeln!(
            out,
            "{}{} [{}] {}",
            "  ".repeat(depth),
            node.name(),
            node.kind(),
            node.id()
        );
        for child in node.children() {
            self.render_into(*child, depth + 1, out);
        }
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn attach(&mut self, node: NodeId, parent: NodeId, index: Option<usize>) {
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            let at = index
                .unwrap_or(parent_node.children.len())
                .min(parent_node.children.len());
            parent_node.children.insert(at, node);
        }
        if let Some(child) = self.nodes.get_mut(&node) {
            child.parent = Some(parent);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(Node::parent);
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.retain(|c| *c != node);
        }
        if let Some(child) = self.nodes.get_mut(&node) {
            child.parent = None;
        }
    }
}

impl PlanDocument for PlanTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn insert_node(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        index: Option<usize>,
    ) -> Result<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(PlanError::NodeNotFound(parent));
        }
        let id = self.allocate_id();
        self.nodes.insert(id, Node::new(id, name, kind));
        self.attach(id, parent, index);
        Ok(id)
    }

    fn move_node(&mut self, node: NodeId, new_parent: NodeId, index: Option<usize>) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(PlanError::NodeNotFound(node));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(PlanError::NodeNotFound(new_parent));
        }
        if node == self.root {
            return Err(PlanError::InvalidMove {
                node,
                target: new_parent,
                reason: MoveRejection::RootNode,
            });
        }
        if self.is_ancestor_or_self(node, new_parent) {
            return Err(PlanError::InvalidMove {
                node,
                target: new_parent,
                reason: MoveRejection::Cycle,
            });
        }

        self.detach(node);
        self.attach(node, new_parent, index);
        Ok(())
    }

    fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(PlanError::NodeNotFound(node));
        }
        if node == self.root {
            return Err(PlanError::RemoveRoot(node));
        }

        let subtree = self.descendants(node);
        self.detach(node);
        self.nodes.remove(&node);
        for id in subtree {
            self.nodes.remove(&id);
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
