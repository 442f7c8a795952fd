//! Grouping Engine
//!
//! Groups similar requests of a test plan into grouping containers and keeps
//! one run of undo/redo history.
//!
//! ## Pipeline
//!
//! ```text
//! collect_leaves ─→ group_leaves ─→ GroupPlanner::apply_group (per group) ─→ OperationLog
//!   (LeafRecord)     (LeafGroup)        (GroupingOperation)
//! ```
//!
//! - [`normalize`]: display name → canonical pattern (`"Login 2"` → `"Login"`)
//! - [`collector`]: depth-first walk recording ungrouped requests with their
//!   parent, index, and ancestor path
//! - [`grouper`]: buckets by parent, then by `(ancestor path, pattern)`
//! - [`planner`]: creates or reuses a container and moves the leaves in
//! - [`history`]: reverts and re-applies the last run
//! - [`session`]: per-document context tying the above together
//!
//! ## Usage
//!
//! ```ignore
//! use planwrap::{GroupingConfig, PlanTree, WrapSession};
//!
//! let mut tree = PlanTree::load(path)?;
//! let mut session = WrapSession::new(GroupingConfig::default());
//! let report = session.wrap(&mut tree, root);
//! println!("{}", report);
//! session.undo(&mut tree);
//! ```

pub mod collector;
pub mod grouper;
pub mod history;
pub mod normalize;
pub mod planner;
pub mod session;

#[cfg(test)]
mod test_support;

pub use collector::{LeafRecord, collect_leaves};
pub use grouper::{GroupKey, LeafGroup, group_leaves};
pub use history::{OperationLog, RedoReport, UndoReport};
pub use normalize::normalize;
pub use planner::{ContainerFactory, GroupPlanner, GroupingContainerFactory, GroupingOperation};
pub use session::{StructureChange, StructureObserver, WrapReport, WrapSession};
