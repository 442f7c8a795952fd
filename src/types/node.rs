use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node within one loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(NodeId)
            .map_err(|_| format!("Invalid node id: {}", s))
    }
}

/// Node kind, fixed when the node is created
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Execution scope holding ordered children (the root of a wrap run)
    Container,
    /// Request-like element eligible for grouping
    GroupableLeaf,
    /// Any other element (timers, assertions, config elements)
    OtherLeaf,
    /// Container created by the grouping engine
    GroupingContainer,
}

impl NodeKind {
    pub fn is_groupable(self) -> bool {
        self == Self::GroupableLeaf
    }

    pub fn is_grouping_container(self) -> bool {
        self == Self::GroupingContainer
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::GroupableLeaf => "groupable-leaf",
            Self::OtherLeaf => "other-leaf",
            Self::GroupingContainer => "grouping-container",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "container" => Ok(Self::Container),
            "groupable-leaf" | "leaf" | "request" => Ok(Self::GroupableLeaf),
            "other-leaf" | "element" => Ok(Self::OtherLeaf),
            "grouping-container" | "group" => Ok(Self::GroupingContainer),
            _ => Err(format!(
                "Unknown node kind: {}. Valid values: container, groupable-leaf, other-leaf, grouping-container",
                s
            )),
        }
    }
}

/// A document element stored in a [`PlanTree`](crate::tree::PlanTree)
///
/// Structure (parent and children) is only mutated through the tree so the
/// child list and parent pointer never disagree.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_parse() {
        assert_eq!("#12".parse::<NodeId>().unwrap(), NodeId::new(12));
        assert_eq!("7".parse::<NodeId>().unwrap(), NodeId::new(7));
        assert!("Login".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_kind_round_trip() {
        for kind in [
            NodeKind::Container,
            NodeKind::GroupableLeaf,
            NodeKind::OtherLeaf,
            NodeKind::GroupingContainer,
        ] {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
        assert_eq!("request".parse::<NodeKind>().unwrap(), NodeKind::GroupableLeaf);
    }

    #[test]
    fn test_node_kind_serde() {
        let json = serde_json::to_string(&NodeKind::GroupingContainer).unwrap();
        assert_eq!(json, "\"grouping-container\"");
    }
}
