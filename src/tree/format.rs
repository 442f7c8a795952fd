//! Document files
//!
//! Test plans are stored as a nested node outline in JSON or YAML:
//!
//! ```json
//! {
//!   "name": "Test Plan",
//!   "kind": "container",
//!   "children": [
//!     { "name": "Login", "kind": "groupable-leaf" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::debug;

use super::document::{PlanDocument, PlanTree};
use crate::types::{NodeId, NodeKind, PlanError, Result};

/// Serialized form of one node and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }
}

/// On-disk document encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(PlanError::Document(format!(
                "Unsupported document extension {:?} for {} (expected .json, .yaml or .yml)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

impl PlanTree {
    /// Build a tree from its serialized outline
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut tree = PlanTree::new(spec.name.clone(), spec.kind);
        let root = tree.root();
        let mut stack: Vec<(NodeId, &NodeSpec)> =
            spec.children.iter().rev().map(|c| (root, c)).collect();

        while let Some((parent, child)) = stack.pop() {
            // Parent was inserted earlier in this loop, so it always exists
            if let Ok(id) = tree.add(parent, &child.name, child.kind) {
                stack.extend(child.children.iter().rev().map(|c| (id, c)));
            }
        }
        tree
    }

    /// Serialize the tree back into an outline
    pub fn to_spec(&self) -> NodeSpec {
        self.spec_for(self.root())
    }

    fn spec_for(&self, id: NodeId) -> NodeSpec {
        let (name, kind) = self
            .node(id)
            .map(|n| (n.name().to_string(), n.kind()))
            .unwrap_or_else(|| (String::new(), NodeKind::OtherLeaf));
        NodeSpec {
            name,
            kind,
            children: self.children(id).iter().map(|c| self.spec_for(*c)).collect(),
        }
    }

    /// Load a document from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        debug!("Loading {:?} document from {}", format, path.display());

        let spec: NodeSpec = match format {
            DocumentFormat::Json => serde_json::from_str(&content)?,
            DocumentFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        Ok(Self::from_spec(&spec))
    }

    /// Encode the document as text
    pub fn encode(&self, format: DocumentFormat, pretty: bool) -> Result<String> {
        let spec = self.to_spec();
        Ok(match format {
            DocumentFormat::Json if pretty => serde_json::to_string_pretty(&spec)?,
            DocumentFormat::Json => serde_json::to_string(&spec)?,
            DocumentFormat::Yaml => serde_yaml::to_string(&spec)?,
        })
    }

    /// Write the document, encoding chosen by the file extension
    pub fn save(&self, path: &Path, pretty: bool) -> Result<()> {
        let format = DocumentFormat::from_path(path)?;
        fs::write(path, self.encode(format, pretty)?)?;
        debug!("Saved {:?} document to {}", format, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_spec() -> NodeSpec {
        NodeSpec::new("Plan", NodeKind::Container).with_children(vec![
            NodeSpec::new("Users", NodeKind::Container).with_children(vec![
                NodeSpec::new("Login 1", NodeKind::GroupableLeaf).with_children(vec![
                    NodeSpec::new("Token extractor", NodeKind::OtherLeaf),
                    NodeSpec::new("Status assertion", NodeKind::OtherLeaf),
                ]),
                NodeSpec::new("Think time", NodeKind::OtherLeaf),
            ]),
        ])
    }

    #[test]
    fn test_from_spec_preserves_order() {
        let tree = PlanTree::from_spec(&sample_spec());
        let users = tree.find_by_name("Users").unwrap();
        assert_eq!(tree.child_names(users), vec!["Login 1", "Think time"]);

        let login = tree.find_by_name("Login 1").unwrap();
        assert_eq!(
            tree.child_names(login),
            vec!["Token extractor", "Status assertion"]
        );
        assert_eq!(tree.to_spec(), sample_spec());
    }

    #[test]
    fn test_save_and_load_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let tree = PlanTree::from_spec(&sample_spec());

        for file in ["plan.json", "plan.yaml"] {
            let path = temp_dir.path().join(file);
            tree.save(&path, true).unwrap();
            let loaded = PlanTree::load(&path).unwrap();
            assert_eq!(loaded.to_spec(), sample_spec());
        }
    }

    #[test]
    fn test_children_default_to_empty() {
        let spec: NodeSpec =
            serde_json::from_str(r#"{"name": "Login", "kind": "groupable-leaf"}"#).unwrap();
        assert!(spec.children.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentFormat::from_path(Path::new("plan.jmx")).unwrap_err();
        assert!(matches!(err, PlanError::Document(_)));
    }
}
