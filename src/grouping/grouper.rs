//! Similarity Grouper
//!
//! Two-phase bucketing: leaves are first split by immediate parent identity,
//! then by [`GroupKey`] inside each parent bucket. Two parents that happen to
//! share a display path never merge, since the parent split comes first.

use std::collections::HashMap;

use super::collector::LeafRecord;
use super::normalize::normalize;
use crate::types::NodeId;

/// Cluster identity: where the leaf lives and what its name looks like
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub ancestor_path: String,
    pub pattern: String,
}

impl GroupKey {
    pub fn for_leaf(leaf: &LeafRecord) -> Self {
        Self {
            ancestor_path: leaf.ancestor_path.clone(),
            pattern: normalize(&leaf.name),
        }
    }
}

/// Leaves sharing one parent and one key
#[derive(Debug, Clone)]
pub struct LeafGroup {
    pub key: GroupKey,
    pub parent: NodeId,
    pub leaves: Vec<LeafRecord>,
}

impl LeafGroup {
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// Partition leaves into groups, ordered by first appearance
///
/// Parent buckets keep the order in which their first leaf was seen, and key
/// buckets inside a parent do the same, so output order is deterministic.
pub fn group_leaves(leaves: &[LeafRecord]) -> Vec<LeafGroup> {
    let mut parent_order: Vec<(NodeId, Vec<&LeafRecord>)> = Vec::new();
    let mut parent_index: HashMap<NodeId, usize> = HashMap::new();

    for leaf in leaves {
        let slot = *parent_index.entry(leaf.parent).or_insert_with(|| {
            parent_order.push((leaf.parent, Vec::new()));
            parent_order.len() - 1
        });
        parent_order[slot].1.push(leaf);
    }

    let mut groups: Vec<LeafGroup> = Vec::new();
    for (parent, bucket) in parent_order {
        let mut key_index: HashMap<GroupKey, usize> = HashMap::new();
        let first = groups.len();

        for leaf in bucket {
            let key = GroupKey::for_leaf(leaf);
            match key_index.get(&key).copied() {
                Some(slot) => groups[first + slot].leaves.push(leaf.clone()),
                None => {
                    key_index.insert(key.clone(), groups.len() - first);
                    groups.push(LeafGroup {
                        key,
                        parent,
                        leaves: vec![leaf.clone()],
                    });
                }
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u64, parent: u64, index: usize, name: &str, path: &str) -> LeafRecord {
        LeafRecord {
            node: NodeId::new(id),
            parent: NodeId::new(parent),
            original_index: index,
            name: name.to_string(),
            ancestor_path: path.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_leaves(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_pattern_in_first_seen_order() {
        let leaves = vec![
            leaf(1, 0, 0, "Login", "T"),
            leaf(2, 0, 1, "Checkout 1", "T"),
            leaf(3, 0, 2, "Login 2", "T"),
            leaf(4, 0, 3, "Checkout 2", "T"),
        ];
        let groups = group_leaves(&leaves);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.pattern, "Login");
        assert_eq!(
            groups[0].leaves.iter().map(|l| l.node.get()).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(groups[1].key.pattern, "Checkout");
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_different_parents_never_merge() {
        // Same path text and same pattern, but two distinct parents
        let leaves = vec![
            leaf(1, 10, 0, "Login 1", "T > Flow"),
            leaf(2, 20, 0, "Login 2", "T > Flow"),
            leaf(3, 10, 1, "Login 3", "T > Flow"),
        ];
        let groups = group_leaves(&leaves);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].parent, NodeId::new(10));
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].parent, NodeId::new(20));
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_path_participates_in_key() {
        let a = GroupKey::for_leaf(&leaf(1, 10, 0, "Login 1", "T > A"));
        let b = GroupKey::for_leaf(&leaf(2, 20, 0, "Login 1", "T > B"));
        assert_eq!(a.pattern, b.pattern);
        assert_ne!(a, b);
    }
}
