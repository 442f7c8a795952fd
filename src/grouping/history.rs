//! Operation Log (undo/redo)
//!
//! Keeps exactly one wrap run. Recording a run replaces the undo stack and
//! clears the redo stack; there is no multi-level history across runs.
//!
//! ```text
//! record_run([op1, op2])   undo: [op1, op2]  redo: []
//! undo()                   undo: []          redo: [op1, op2]
//! redo()                   undo: [op1, op2]  redo: []
//! ```
//!
//! Undo walks operations (and the leaves inside each) last-to-first so every
//! leaf lands back on the index it held right before it moved. Redo replays
//! operations first-to-last, like the original run. Nodes deleted from the
//! document in the meantime are skipped and not counted.
//!
//! The restored tree does not depend on undo processing order: each leaf goes
//! back to the index it held right before it moved, and walking in reverse
//! replays those inserts so every recorded index is valid when it is used.

use chrono::{DateTime, Utc};
use std::fmt;

use tracing::{debug, info, warn};

use super::planner::{ContainerFactory, GroupingOperation, current_index};
use crate::tree::PlanDocument;

// =============================================================================
// Reports
// =============================================================================

/// Outcome of [`OperationLog::undo`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoReport {
    pub restored_leaf_count: usize,
    pub containers_removed: usize,
}

impl fmt::Display for UndoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.restored_leaf_count == 0 {
            write!(f, "Nothing to undo")
        } else {
            write!(
                f,
                "Restored {} element(s), removed {} group container(s)",
                self.restored_leaf_count, self.containers_removed
            )
        }
    }
}

/// Outcome of [`OperationLog::redo`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedoReport {
    pub regrouped_leaf_count: usize,
    pub containers_recreated: usize,
}

impl fmt::Display for RedoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.regrouped_leaf_count == 0 {
            write!(f, "Nothing to redo")
        } else {
            write!(
                f,
                "Regrouped {} element(s), recreated {} group container(s)",
                self.regrouped_leaf_count, self.containers_recreated
            )
        }
    }
}

// =============================================================================
// Operation Log
// =============================================================================

#[derive(Debug, Default)]
pub struct OperationLog {
    undo_stack: Vec<GroupingOperation>,
    redo_stack: Vec<GroupingOperation>,
    recorded_at: Option<DateTime<Utc>>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace history with a new run
    pub fn record_run(&mut self, operations: Vec<GroupingOperation>) {
        debug!("Recording wrap run with {} operation(s)", operations.len());
        self.undo_stack = operations;
        self.redo_stack.clear();
        self.recorded_at = Some(Utc::now());
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// When the current run was recorded
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }

    /// Drop all history (document closed or replaced)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.recorded_at = None;
    }

    /// Move every leaf of the run back to where it came from
    pub fn undo<D>(&mut self, doc: &mut D) -> UndoReport
    where
        D: PlanDocument + ?Sized,
    {
        let mut report = UndoReport::default();
        if self.undo_stack.is_empty() {
            return report;
        }

        let operations = std::mem::take(&mut self.undo_stack);
        for op in operations.iter().rev() {
            if !doc.contains(op.original_parent) {
                warn!(
                    "Original parent {} of '{}' no longer exists, skipping",
                    op.original_parent, op.label
                );
                continue;
            }

            for leaf in op.moved_leaves.iter().rev() {
                let index = op.original_indices.get(leaf).copied();
                match doc.move_node(*leaf, op.original_parent, index) {
                    Ok(()) => report.restored_leaf_count += 1,
                    Err(e) if e.is_stale_reference() => {
                        debug!("Leaf {} was deleted, skipping restore", leaf);
                    }
                    Err(e) => warn!("Failed to restore {}: {}", leaf, e),
                }
            }

            if doc.contains(op.container) && doc.children(op.container).is_empty() {
                match doc.remove_node(op.container) {
                    Ok(()) => report.containers_removed += 1,
                    Err(e) => warn!("Failed to remove container '{}': {}", op.label, e),
                }
            }
        }

        info!(
            "Undo restored {} leaf(s) across {} operation(s)",
            report.restored_leaf_count,
            operations.len()
        );
        self.redo_stack = operations;
        report
    }

    /// Re-apply the last undone run
    ///
    /// A container that no longer exists is recreated through `factory` at the
    /// end of its original parent; its former position is not recoverable.
    pub fn redo<D, F>(&mut self, doc: &mut D, factory: &F) -> RedoReport
    where
        D: PlanDocument + ?Sized,
        F: ContainerFactory + ?Sized,
    {
        let mut report = RedoReport::default();
        if self.redo_stack.is_empty() {
            return report;
        }

        let mut operations = std::mem::take(&mut self.redo_stack);
        for op in operations.iter_mut() {
            if !doc.contains(op.container) {
                if !doc.contains(op.original_parent) {
                    warn!(
                        "Cannot recreate '{}': parent {} no longer exists",
                        op.label, op.original_parent
                    );
                    continue;
                }
                match factory.create_container(doc, op.original_parent, &op.label) {
                    Ok(id) => {
                        debug!("Recreated container '{}' as {}", op.label, id);
                        op.container = id;
                        op.created = true;
                        report.containers_recreated += 1;
                    }
                    Err(e) => {
                        warn!("Failed to recreate container '{}': {}", op.label, e);
                        continue;
                    }
                }
            }

            for leaf in &op.moved_leaves {
                let index = current_index(doc, *leaf, op.original_parent);
                match doc.move_node(*leaf, op.container, None) {
                    Ok(()) => {
                        if let Some(index) = index {
                            op.original_indices.insert(*leaf, index);
                        }
                        report.regrouped_leaf_count += 1;
                    }
                    Err(e) if e.is_stale_reference() => {
                        debug!("Leaf {} was deleted, skipping regroup", leaf);
                    }
                    Err(e) => warn!("Failed to regroup {}: {}", leaf, e),
                }
            }
        }

        info!(
            "Redo regrouped {} leaf(s) across {} operation(s)",
            report.regrouped_leaf_count,
            operations.len()
        );
        self.undo_stack = operations;
        report
    }
}

// =============================================================================
// Tests
// =============================================================================
