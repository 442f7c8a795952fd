//! Container Planner / Mover
//!
//! Applies one [`LeafGroup`]: finds or creates its grouping container, places a
//! new container where the group's first leaf used to be, then moves every leaf
//! (children included) into it in original document order.
//!
//! Failures are local. A container that cannot be created skips the group; a
//! leaf that cannot be moved is left in place while the rest of the group
//! proceeds. Leaves already moved are never rolled back, and the returned
//! [`GroupingOperation`] lists exactly the leaves that did move.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::grouper::LeafGroup;
use crate::config::GroupingConfig;
use crate::constants::grouping::{DEFAULT_GROUP_LABEL, PATTERN_MARKER};
use crate::tree::PlanDocument;
use crate::types::{NodeId, NodeKind, PlanError, Result};

// =============================================================================
// Container Factory
// =============================================================================

/// Creates grouping containers on behalf of the engine
pub trait ContainerFactory {
    /// Create a grouping container labelled `label` as the last child of `parent`
    fn create_container<D>(&self, doc: &mut D, parent: NodeId, label: &str) -> Result<NodeId>
    where
        D: PlanDocument + ?Sized;
}

/// Default factory: a plain [`NodeKind::GroupingContainer`] node
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupingContainerFactory;

impl ContainerFactory for GroupingContainerFactory {
    fn create_container<D>(&self, doc: &mut D, parent: NodeId, label: &str) -> Result<NodeId>
    where
        D: PlanDocument + ?Sized,
    {
        if label.trim().is_empty() {
            return Err(PlanError::container_creation(label, "label is empty"));
        }
        doc.insert_node(parent, label, NodeKind::GroupingContainer, None)
            .map_err(|e| PlanError::container_creation(label, e.to_string()))
    }
}

// =============================================================================
// Grouping Operation
// =============================================================================

/// Record of one container filled during a wrap run
///
/// Holds only node ids; any of them may have been deleted from the document by
/// the time the operation is undone or redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingOperation {
    pub container: NodeId,
    pub label: String,
    /// `false` when an existing container with the same label was reused
    pub created: bool,
    pub original_parent: NodeId,
    /// Leaves in the order they were moved into the container
    pub moved_leaves: Vec<NodeId>,
    /// Position of each leaf under `original_parent` right before it moved
    pub original_indices: HashMap<NodeId, usize>,
}

impl GroupingOperation {
    pub fn leaf_count(&self) -> usize {
        self.moved_leaves.len()
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Turns groups into containers
#[derive(Debug, Clone)]
pub struct GroupPlanner {
    label_template: String,
    reuse_existing: bool,
}

impl GroupPlanner {
    pub fn new(config: &GroupingConfig) -> Self {
        Self {
            label_template: config.label_template.clone(),
            reuse_existing: config.reuse_existing,
        }
    }

    /// Container label for a group
    ///
    /// An empty pattern falls back to the first leaf's display name, then to
    /// [`DEFAULT_GROUP_LABEL`] when that is blank too.
    pub fn label_for(&self, group: &LeafGroup) -> String {
        let pattern = std::iter::once(group.key.pattern.trim())
            .chain(group.leaves.first().map(|l| l.name.trim()))
            .find(|p| !p.is_empty())
            .unwrap_or(DEFAULT_GROUP_LABEL);
        self.label_template
            .replace(PATTERN_MARKER, pattern)
            .trim()
            .to_string()
    }

    /// Existing grouping container under `parent` carrying `label`
    pub fn find_existing<D>(&self, doc: &D, parent: NodeId, label: &str) -> Option<NodeId>
    where
        D: PlanDocument + ?Sized,
    {
        if !self.reuse_existing {
            return None;
        }
        doc.children(parent).iter().copied().find(|id| {
            doc.kind(*id) == Some(NodeKind::GroupingContainer) && doc.name(*id) == Some(label)
        })
    }

    /// Apply one group to the document
    ///
    /// Returns `None` when the group was skipped (container creation failed or
    /// no leaf could be moved).
    pub fn apply_group<D, F>(
        &self,
        doc: &mut D,
        group: &LeafGroup,
        factory: &F,
    ) -> Option<GroupingOperation>
    where
        D: PlanDocument + ?Sized,
        F: ContainerFactory + ?Sized,
    {
        let parent = group.parent;
        let mut leaves: Vec<_> = group.leaves.iter().collect();
        leaves.sort_by_key(|l| l.original_index);
        let first = leaves.first()?;

        let label = self.label_for(group);
        let (container, created) = match self.find_existing(doc, parent, &label) {
            Some(existing) => {
                debug!("Reusing grouping container '{}' ({})", label, existing);
                (existing, false)
            }
            None => match factory.create_container(doc, parent, &label) {
                Ok(id) => (id, true),
                Err(e) => {
                    warn!("Skipping group '{}': {}", label, e);
                    return None;
                }
            },
        };

        if created {
            let target = current_index(doc, first.node, parent).unwrap_or(first.original_index);
            if let Err(e) = doc.move_node(container, parent, Some(target)) {
                warn!(
                    "Could not position container '{}' at index {}: {}",
                    label, target, e
                );
            }
        }

        let mut moved_leaves = Vec::with_capacity(leaves.len());
        let mut original_indices = HashMap::with_capacity(leaves.len());

        for leaf in leaves {
            let Some(index) = current_index(doc, leaf.node, parent) else {
                warn!(
                    "Leaf '{}' ({}) is no longer under {}, skipping",
                    leaf.name, leaf.node, parent
                );
                continue;
            };

            match doc.move_node(leaf.node, container, None) {
                Ok(()) => {
                    original_indices.insert(leaf.node, index);
                    moved_leaves.push(leaf.node);
                }
                Err(e) => warn!("Failed to move '{}' into '{}': {}", leaf.name, label, e),
            }
        }

        if moved_leaves.is_empty() {
            warn!("No leaf moved into '{}', discarding group", label);
            if created && let Err(e) = doc.remove_node(container) {
                warn!("Could not remove empty container '{}': {}", label, e);
            }
            return None;
        }

        debug!(
            "Grouped {} leaves into '{}' ({})",
            moved_leaves.len(),
            label,
            container
        );

        Some(GroupingOperation {
            container,
            label,
            created,
            original_parent: parent,
            moved_leaves,
            original_indices,
        })
    }
}

/// Index of `node` under `parent`, if it is still a direct child
pub(crate) fn current_index<D>(doc: &D, node: NodeId, parent: NodeId) -> Option<usize>
where
    D: PlanDocument + ?Sized,
{
    if doc.parent(node) != Some(parent) {
        return None;
    }
    doc.index_of(node)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::collector::collect_leaves;
    use crate::grouping::grouper::group_leaves;
    use crate::grouping::test_support::RejectingDocument;
    use crate::tree::PlanTree;

    fn planner() -> GroupPlanner {
        GroupPlanner::new(&GroupingConfig::default())
    }

    /// Factory that always fails
    struct BrokenFactory;

    impl ContainerFactory for BrokenFactory {
        fn create_container<D>(&self, _doc: &mut D, _parent: NodeId, label: &str) -> Result<NodeId>
        where
            D: PlanDocument + ?Sized,
        {
            Err(PlanError::container_creation(label, "factory offline"))
        }
    }

    fn first_group(tree: &PlanTree, root: NodeId) -> LeafGroup {
        let leaves = collect_leaves(tree, root, " > ");
        group_leaves(&leaves).remove(0)
    }

    #[test]
    fn test_order_and_position_preserved() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let before = tree.add(root, "Setup", NodeKind::OtherLeaf).unwrap();
        let a = tree.add(root, "Item 1", NodeKind::GroupableLeaf).unwrap();
        let b = tree.add(root, "Item 2", NodeKind::GroupableLeaf).unwrap();
        let c = tree.add(root, "Item 3", NodeKind::GroupableLeaf).unwrap();
        let after = tree.add(root, "Teardown", NodeKind::OtherLeaf).unwrap();

        let mut group = first_group(&tree, root);
        // Grouper output order is not guaranteed to follow indices
        group.leaves.reverse();

        let op = planner()
            .apply_group(&mut tree, &group, &GroupingContainerFactory)
            .unwrap();

        assert_eq!(tree.children(op.container), &[a, b, c]);
        assert_eq!(tree.children(root), &[before, op.container, after]);
        assert_eq!(op.moved_leaves, vec![a, b, c]);
        assert_eq!(op.label, "Item");
        assert!(op.created);
        // Each leaf sat at index 2 right before it moved (container took index 1)
        assert_eq!(op.original_indices[&a], 2);
        assert_eq!(op.original_indices[&c], 2);
    }

    #[test]
    fn test_leaf_children_travel_with_leaf() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let login = tree.add(root, "Login", NodeKind::GroupableLeaf).unwrap();
        let token = tree.add(login, "Token extractor", NodeKind::OtherLeaf).unwrap();
        let check = tree.add(login, "Status check", NodeKind::OtherLeaf).unwrap();

        let group = first_group(&tree, root);
        let op = planner()
            .apply_group(&mut tree, &group, &GroupingContainerFactory)
            .unwrap();

        assert_eq!(tree.parent(login), Some(op.container));
        assert_eq!(tree.children(login), &[token, check]);
    }

    #[test]
    fn test_reuses_container_with_same_label() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let existing = tree.add(root, "Login", NodeKind::GroupingContainer).unwrap();
        let old = tree.add(existing, "Login 1", NodeKind::GroupableLeaf).unwrap();
        let new = tree.add(root, "Login 2", NodeKind::GroupableLeaf).unwrap();

        let group = first_group(&tree, root);
        let op = planner()
            .apply_group(&mut tree, &group, &GroupingContainerFactory)
            .unwrap();

        assert_eq!(op.container, existing);
        assert!(!op.created);
        assert_eq!(tree.children(existing), &[old, new]);
        assert_eq!(tree.children(root), &[existing]);
    }

    #[test]
    fn test_reuse_can_be_disabled() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let existing = tree.add(root, "Login", NodeKind::GroupingContainer).unwrap();
        tree.add(root, "Login 2", NodeKind::GroupableLeaf).unwrap();

        let config = GroupingConfig {
            reuse_existing: false,
            ..GroupingConfig::default()
        };
        let group = first_group(&tree, root);
        let op = GroupPlanner::new(&config)
            .apply_group(&mut tree, &group, &GroupingContainerFactory)
            .unwrap();

        assert_ne!(op.container, existing);
        assert!(op.created);
    }

    #[test]
    fn test_factory_failure_skips_group() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let a = tree.add(root, "Login", NodeKind::GroupableLeaf).unwrap();

        let group = first_group(&tree, root);
        assert!(planner().apply_group(&mut tree, &group, &BrokenFactory).is_none());
        assert_eq!(tree.children(root), &[a]);
    }

    #[test]
    fn test_move_failure_records_only_moved_leaves() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let a = tree.add(root, "Login 1", NodeKind::GroupableLeaf).unwrap();
        let b = tree.add(root, "Login 2", NodeKind::GroupableLeaf).unwrap();
        let c = tree.add(root, "Login 3", NodeKind::GroupableLeaf).unwrap();

        let group = first_group(&tree, root);
        let mut doc = RejectingDocument::new(tree, [b]);
        let op = planner()
            .apply_group(&mut doc, &group, &GroupingContainerFactory)
            .unwrap();

        assert_eq!(op.moved_leaves, vec![a, c]);
        assert!(!op.original_indices.contains_key(&b));
        assert_eq!(doc.children(root), &[op.container, b]);
    }

    #[test]
    fn test_all_moves_failing_discards_container() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let a = tree.add(root, "Login", NodeKind::GroupableLeaf).unwrap();

        let group = first_group(&tree, root);
        let mut doc = RejectingDocument::new(tree, [a]);
        assert!(
            planner()
                .apply_group(&mut doc, &group, &GroupingContainerFactory)
                .is_none()
        );
        assert_eq!(doc.children(root), &[a]);
    }

    #[test]
    fn test_label_template_and_empty_pattern() {
        let config = GroupingConfig {
            label_template: "TX - {pattern}".to_string(),
            ..GroupingConfig::default()
        };
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        tree.add(root, "Search 4", NodeKind::GroupableLeaf).unwrap();
        let group = first_group(&tree, root);
        assert_eq!(GroupPlanner::new(&config).label_for(&group), "TX - Search");

        let mut blank = PlanTree::new("T", NodeKind::Container);
        let root = blank.root();
        blank.add(root, "  ", NodeKind::GroupableLeaf).unwrap();
        let group = first_group(&blank, root);
        assert_eq!(GroupPlanner::new(&config).label_for(&group), "TX - Group");
        assert_eq!(planner().label_for(&group), "Group");
    }

    #[test]
    fn test_blank_named_leaves_are_wrapped() {
        let mut tree = PlanTree::new("T", NodeKind::Container);
        let root = tree.root();
        let empty = tree.add(root, "", NodeKind::GroupableLeaf).unwrap();
        let space = tree.add(root, " ", NodeKind::GroupableLeaf).unwrap();

        let group = first_group(&tree, root);
        assert_eq!(group.len(), 2);
        let op = planner()
            .apply_group(&mut tree, &group, &GroupingContainerFactory)
            .unwrap();

        assert_eq!(op.label, "Group");
        assert_eq!(tree.children(root), &[op.container]);
        assert_eq!(tree.children(op.container), &[empty, space]);
    }
}
