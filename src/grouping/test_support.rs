//! Document wrappers for exercising failure paths in tests

use std::collections::HashSet;

use crate::tree::{PlanDocument, PlanTree};
use crate::types::{MoveRejection, Node, NodeId, NodeKind, PlanError, Result};

/// Delegates to a [`PlanTree`] but refuses to move selected nodes
pub struct RejectingDocument {
    pub inner: PlanTree,
    rejected: HashSet<NodeId>,
}

impl RejectingDocument {
    pub fn new(inner: PlanTree, rejected: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            inner,
            rejected: rejected.into_iter().collect(),
        }
    }
}

impl PlanDocument for RejectingDocument {
    fn root(&self) -> NodeId {
        self.inner.root()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node(id)
    }

    fn insert_node(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        index: Option<usize>,
    ) -> Result<NodeId> {
        self.inner.insert_node(parent, name, kind, index)
    }

    fn move_node(&mut self, node: NodeId, new_parent: NodeId, index: Option<usize>) -> Result<()> {
        if self.rejected.contains(&node) {
            return Err(PlanError::InvalidMove {
                node,
                target: new_parent,
                reason: MoveRejection::Placement,
            });
        }
        self.inner.move_node(node, new_parent, index)
    }

    fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.inner.remove_node(node)
    }
}
