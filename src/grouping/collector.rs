//! Leaf Collector
//!
//! Finds groupable leaves below a wrap root in document order. Subtrees rooted
//! at a grouping container are already grouped and are skipped entirely.

use crate::tree::PlanDocument;
use crate::types::{NodeId, NodeKind};

/// A groupable leaf found during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRecord {
    pub node: NodeId,
    /// Immediate parent at discovery time
    pub parent: NodeId,
    /// Position under `parent` at discovery time
    pub original_index: usize,
    /// Display name at discovery time
    pub name: String,
    /// Ancestor display names from the wrap root down to `parent`
    pub ancestor_path: String,
}

/// Collect groupable leaves below `root` (exclusive) in depth-first child order
pub fn collect_leaves<D>(doc: &D, root: NodeId, delimiter: &str) -> Vec<LeafRecord>
where
    D: PlanDocument + ?Sized,
{
    let mut leaves = Vec::new();
    let Some(root_name) = doc.name(root) else {
        return leaves;
    };

    let mut path = vec![root_name.to_string()];
    visit(doc, root, &mut path, delimiter, &mut leaves);
    leaves
}

fn visit<D>(
    doc: &D,
    parent: NodeId,
    path: &mut Vec<String>,
    delimiter: &str,
    out: &mut Vec<LeafRecord>,
) where
    D: PlanDocument + ?Sized,
{
    for (index, child) in doc.children(parent).iter().enumerate() {
        let Some(node) = doc.node(*child) else {
            continue;
        };

        match node.kind() {
            NodeKind::GroupableLeaf => out.push(LeafRecord {
                node: *child,
                parent,
                original_index: index,
                name: node.name().to_string(),
                ancestor_path: path.join(delimiter),
            }),
            NodeKind::GroupingContainer => {}
            NodeKind::Container | NodeKind::OtherLeaf => {
                path.push(node.name().to_string());
                visit(doc, *child, path, delimiter, out);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::PlanTree;

    const DELIM: &str = " > ";

    #[test]
    fn test_collects_in_document_order() {
        let mut tree = PlanTree::new("Plan", NodeKind::Container);
        let root = tree.root();
        let users = tree.add(root, "Users", NodeKind::Container).unwrap();
        let home = tree.add(users, "Home", NodeKind::GroupableLeaf).unwrap();
        let flow = tree.add(users, "Flow", NodeKind::Container).unwrap();
        let login = tree.add(flow, "Login 1", NodeKind::GroupableLeaf).unwrap();
        tree.add(users, "Timer", NodeKind::OtherLeaf).unwrap();
        let logout = tree.add(users, "Logout", NodeKind::GroupableLeaf).unwrap();

        let leaves = collect_leaves(&tree, users, DELIM);
        let ids: Vec<NodeId> = leaves.iter().map(|l| l.node).collect();
        assert_eq!(ids, vec![home, login, logout]);

        assert_eq!(leaves[0].ancestor_path, "Users");
        assert_eq!(leaves[1].ancestor_path, "Users > Flow");
        assert_eq!(leaves[1].parent, flow);
        assert_eq!(leaves[1].original_index, 0);
        assert_eq!(leaves[2].original_index, 3);
    }

    #[test]
    fn test_skips_grouping_containers_and_leaf_subtrees() {
        let mut tree = PlanTree::new("Plan", NodeKind::Container);
        let root = tree.root();
        let grouped = tree.add(root, "Login", NodeKind::GroupingContainer).unwrap();
        tree.add(grouped, "Login 1", NodeKind::GroupableLeaf).unwrap();
        let search = tree.add(root, "Search", NodeKind::GroupableLeaf).unwrap();
        // A request nested under a request travels with its parent
        tree.add(search, "Search redirect", NodeKind::GroupableLeaf)
            .unwrap();

        let leaves = collect_leaves(&tree, root, DELIM);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].node, search);
        assert_eq!(leaves[0].ancestor_path, "Plan");
    }

    #[test]
    fn test_discovery_is_idempotent() {
        let mut tree = PlanTree::new("Plan", NodeKind::Container);
        let root = tree.root();
        for name in ["A 1", "B 1", "A 2"] {
            tree.add(root, name, NodeKind::GroupableLeaf).unwrap();
        }
        assert_eq!(
            collect_leaves(&tree, root, DELIM),
            collect_leaves(&tree, root, DELIM)
        );
    }

    #[test]
    fn test_unknown_root_yields_nothing() {
        let tree = PlanTree::new("Plan", NodeKind::Container);
        assert!(collect_leaves(&tree, NodeId::new(42), DELIM).is_empty());
    }
}
