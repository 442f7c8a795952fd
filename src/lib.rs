//! planwrap - Similarity Grouping for Test-Plan Documents
//!
//! Finds requests with similar names inside a hierarchical test plan and
//! wraps each cluster into a grouping container, with one run of undo/redo.
//!
//! ## Core Features
//!
//! - **Name Normalization**: numbers and UUIDs are masked so `"Login 2"` and
//!   `"Login 7"` share a pattern
//! - **Scoped Grouping**: requests are only grouped with siblings sharing the
//!   same ancestor path
//! - **Order Preservation**: containers take the place of their first request
//! - **Undo/Redo**: the last run can be reverted and re-applied exactly
//! - **Layered Configuration**: defaults, global, project, and environment
//!
//! ## Quick Start
//!
//! ```ignore
//! use planwrap::{GroupingConfig, PlanDocument, PlanTree, WrapSession};
//!
//! let mut tree = PlanTree::load("plan.json".as_ref())?;
//! let root = tree.find_by_name("Thread Group").unwrap_or(tree.root());
//!
//! let mut session = WrapSession::new(GroupingConfig::default());
//! let report = session.wrap(&mut tree, root);
//! println!("{}", report);
//!
//! session.undo(&mut tree);
//! ```
//!
//! ## Modules
//!
//! - [`tree`]: document tree model and JSON/YAML document files
//! - [`grouping`]: normalizer, collector, grouper, planner, history, session
//! - [`config`]: figment-layered configuration
//! - [`cli`]: command handlers used by the `planwrap` binary

pub mod cli;
pub mod config;
pub mod constants;
pub mod grouping;
pub mod tree;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, GroupingConfig, OutputConfig};

// Error Types
pub use types::error::{MoveRejection, PlanError, Result};

// Document Model
pub use tree::{DocumentFormat, NodeSpec, PlanDocument, PlanTree};
pub use types::{Node, NodeId, NodeKind, SessionId};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use grouping::{
    // Planner
    ContainerFactory,
    GroupPlanner,
    GroupingContainerFactory,
    GroupingOperation,
    // History
    OperationLog,
    RedoReport,
    UndoReport,
    // Session
    StructureChange,
    StructureObserver,
    WrapReport,
    WrapSession,
    // Pipeline
    collect_leaves,
    group_leaves,
    normalize,
};
