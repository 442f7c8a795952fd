//! CLI Common Utilities
//!
//! Shared document loading and node resolution for command handlers.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, ConfigLoader};
use crate::tree::{PlanDocument, PlanTree};
use crate::types::{NodeId, PlanError, Result};

/// Output target meaning "print to stdout"
pub const STDOUT_TARGET: &str = "-";

/// Load configuration from an explicit file, or through the full resolution chain
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            debug!("Using config file: {}", path.display());
            ConfigLoader::load_from_file(path)
        }
        None => ConfigLoader::load(),
    }
}

/// Command execution context
///
/// One loaded document plus the configuration the command runs with.
pub struct CommandContext {
    pub config: Config,
    pub document_path: PathBuf,
    pub tree: PlanTree,
}

impl CommandContext {
    pub fn load(document_path: &Path, config: Config) -> Result<Self> {
        let tree = PlanTree::load(document_path)?;
        debug!(
            "Loaded {} nodes from {}",
            tree.len(),
            document_path.display()
        );
        Ok(Self {
            config,
            document_path: document_path.to_path_buf(),
            tree,
        })
    }

    /// Write the document to `target` (or back to its source), returning where it went
    ///
    /// `-` prints it to stdout in the configured format.
    pub fn write(&self, target: Option<&Path>) -> Result<Option<PathBuf>> {
        let path = target.unwrap_or(self.document_path.as_path());
        if path == Path::new(STDOUT_TARGET) {
            let output = &self.config.output;
            println!("{}", self.tree.encode(output.stdout_format, output.pretty)?);
            return Ok(None);
        }
        self.tree.save(path, self.config.output.pretty)?;
        Ok(Some(path.to_path_buf()))
    }
}

/// Resolve a `--root` selector: node id (`#3` or `3`) first, then display name
///
/// No selector means the document root.
pub fn resolve_root(tree: &PlanTree, selector: Option<&str>) -> Result<NodeId> {
    let Some(selector) = selector.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(tree.root());
    };

    if let Ok(id) = selector.parse::<NodeId>()
        && tree.contains(id)
    {
        return Ok(id);
    }

    tree.find_by_name(selector)
        .ok_or_else(|| PlanError::Document(format!("No node matches '{}'", selector)))
}
