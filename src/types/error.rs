//! Unified Error Type System
//!
//! Centralized error types for the whole crate.
//!
//! ## Error Kinds
//!
//! - **System**: IO and (de)serialization failures while reading or writing documents
//! - **Tree**: rejected structural mutations (unknown node, cycle, root removal)
//! - **Grouping**: container creation failures reported by a [`ContainerFactory`]
//!
//! Engine operations (`wrap`, `undo`, `redo`) do not surface tree or grouping errors to the
//! caller. They log them and report partial success through count fields instead, so a
//! `PlanError` crossing the engine boundary always means the document itself could not be
//! read, written, or configured.
//!
//! [`ContainerFactory`]: crate::grouping::ContainerFactory

use thiserror::Error;

use super::node::NodeId;

// =============================================================================
// Move Rejection
// =============================================================================

/// Why the tree refused a reparent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The document root has no parent and cannot be moved
    RootNode,
    /// Target is the node itself or one of its descendants
    Cycle,
    /// Rejected by a host-specific placement rule
    Placement,
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootNode => write!(f, "the document root cannot be moved"),
            Self::Cycle => write!(f, "target is the node itself or one of its descendants"),
            Self::Placement => write!(f, "placement rejected by the document"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PlanError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Node {0} does not exist in the document")]
    NodeNotFound(NodeId),

    #[error("Cannot move node {node} under {target}: {reason}")]
    InvalidMove {
        node: NodeId,
        target: NodeId,
        reason: MoveRejection,
    },

    #[error("Cannot remove node {0}: it is the document root")]
    RemoveRoot(NodeId),

    // -------------------------------------------------------------------------
    // Grouping Errors
    // -------------------------------------------------------------------------
    #[error("Failed to create grouping container '{label}': {reason}")]
    ContainerCreation { label: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    /// Create a container creation error
    pub fn container_creation(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContainerCreation {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from a stale node reference
    ///
    /// Undo and redo skip leaves whose move fails with one of these.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }
}

// =============================================================================
// Tests
// =============================================================================
