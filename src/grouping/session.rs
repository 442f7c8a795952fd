//! Wrap Session
//!
//! Session-scoped state for one open document: the operation log, the grouping
//! configuration, and the container factory. A wrap run goes
//! `Idle → Discovering → Grouping → Applying (one step per group) → Idle`;
//! nothing but the operation log outlives a call.
//!
//! Every public operation returns a report. Precondition failures, factory
//! errors, and rejected moves are logged and reflected in the report counts.

use chrono::{DateTime, Utc};
use std::fmt;

use tracing::{debug, info, info_span, warn};

use super::collector::collect_leaves;
use super::grouper::{LeafGroup, group_leaves};
use super::history::{OperationLog, RedoReport, UndoReport};
use super::planner::{ContainerFactory, GroupPlanner, GroupingContainerFactory};
use crate::config::GroupingConfig;
use crate::tree::PlanDocument;
use crate::types::{NodeId, NodeKind, SessionId};

// =============================================================================
// Observer
// =============================================================================

/// Kind of structural change a session just made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureChange {
    Wrapped,
    Undone,
    Redone,
}

/// Notified after every call that changed the document structure
///
/// Hosts use this to repaint or re-index their view of the tree.
pub trait StructureObserver {
    fn structure_changed(&self, change: StructureChange);
}

// =============================================================================
// Wrap Report
// =============================================================================

/// Outcome of [`WrapSession::wrap`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapReport {
    pub groups_created: usize,
    pub groups_reused: usize,
    pub leaves_moved: usize,
    pub groups_failed: usize,
    /// Set when the run was not applicable and nothing changed
    pub skipped: Option<String>,
}

impl WrapReport {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_applied(&self) -> bool {
        self.skipped.is_none() && self.leaves_moved > 0
    }
}

impl fmt::Display for WrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = &self.skipped {
            return write!(f, "Nothing to wrap: {}", reason);
        }
        write!(
            f,
            "Created {} group(s), reused {}, moved {} element(s)",
            self.groups_created, self.groups_reused, self.leaves_moved
        )?;
        if self.groups_failed > 0 {
            write!(f, " ({} group(s) failed)", self.groups_failed)?;
        }
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct WrapSession<F = GroupingContainerFactory> {
    id: SessionId,
    started_at: DateTime<Utc>,
    config: GroupingConfig,
    planner: GroupPlanner,
    factory: F,
    log: OperationLog,
    observer: Option<Box<dyn StructureObserver>>,
}

impl<F> fmt::Debug for WrapSession<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapSession")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("config", &self.config)
            .field("log", &self.log)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl WrapSession {
    pub fn new(config: GroupingConfig) -> Self {
        Self::with_factory(config, GroupingContainerFactory)
    }
}

impl Default for WrapSession {
    fn default() -> Self {
        Self::new(GroupingConfig::default())
    }
}

impl<F: ContainerFactory> WrapSession<F> {
    pub fn with_factory(config: GroupingConfig, factory: F) -> Self {
        Self {
            id: SessionId::generate(),
            started_at: Utc::now(),
            planner: GroupPlanner::new(&config),
            config,
            factory,
            log: OperationLog::new(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl StructureObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    pub fn history(&self) -> &OperationLog {
        &self.log
    }

    /// Drop undo/redo history (document closed or replaced)
    pub fn reset(&mut self) {
        debug!("Resetting session {}", self.id.short());
        self.log.clear();
    }

    /// Why `root` cannot be wrapped, if it cannot
    pub fn check_root<D>(&self, doc: &D, root: NodeId) -> Option<String>
    where
        D: PlanDocument + ?Sized,
    {
        match doc.kind(root) {
            None => Some(format!("node {} does not exist", root)),
            Some(NodeKind::Container) => None,
            Some(kind) => Some(format!(
                "'{}' is a {}, select a container",
                doc.name(root).unwrap_or_default(),
                kind
            )),
        }
    }

    /// Discover and group without touching the document
    ///
    /// Returns the groups a wrap would apply, or the reason it is not applicable.
    pub fn preview<D>(&self, doc: &D, root: NodeId) -> Result<Vec<LeafGroup>, String>
    where
        D: PlanDocument + ?Sized,
    {
        if let Some(reason) = self.check_root(doc, root) {
            return Err(reason);
        }

        let leaves = collect_leaves(doc, root, &self.config.path_delimiter);
        if leaves.is_empty() {
            return Err(format!(
                "no ungrouped requests under '{}'",
                doc.name(root).unwrap_or_default()
            ));
        }

        let groups: Vec<LeafGroup> = group_leaves(&leaves)
            .into_iter()
            .filter(|g| g.len() >= self.config.min_group_size)
            .collect();
        if groups.is_empty() {
            return Err(format!(
                "no group reaches the minimum size of {}",
                self.config.min_group_size
            ));
        }

        debug!(
            "Discovered {} leaves in {} group(s)",
            leaves.len(),
            groups.len()
        );
        Ok(groups)
    }

    /// Group similar requests under `root` into grouping containers
    ///
    /// A run that applies at least one group replaces the undo history.
    pub fn wrap<D>(&mut self, doc: &mut D, root: NodeId) -> WrapReport
    where
        D: PlanDocument + ?Sized,
    {
        let span = info_span!("wrap", session = %self.id.short(), root = %root);
        let _guard = span.enter();

        let groups = match self.preview(doc, root) {
            Ok(groups) => groups,
            Err(reason) => {
                info!("Wrap not applicable: {}", reason);
                return WrapReport::not_applicable(reason);
            }
        };

        let mut report = WrapReport::default();
        let mut operations = Vec::with_capacity(groups.len());

        for group in &groups {
            match self.planner.apply_group(doc, group, &self.factory) {
                Some(op) => {
                    if op.created {
                        report.groups_created += 1;
                    } else {
                        report.groups_reused += 1;
                    }
                    report.leaves_moved += op.leaf_count();
                    operations.push(op);
                }
                None => report.groups_failed += 1,
            }
        }

        if operations.is_empty() {
            warn!("Every group failed, keeping previous history");
        } else {
            self.log.record_run(operations);
            self.notify(StructureChange::Wrapped);
        }

        info!(
            "Wrap finished: {} created, {} reused, {} failed, {} leaves moved",
            report.groups_created, report.groups_reused, report.groups_failed, report.leaves_moved
        );
        report
    }

    pub fn undo<D>(&mut self, doc: &mut D) -> UndoReport
    where
        D: PlanDocument + ?Sized,
    {
        let report = self.log.undo(doc);
        if report.restored_leaf_count > 0 || report.containers_removed > 0 {
            self.notify(StructureChange::Undone);
        }
        report
    }

    pub fn redo<D>(&mut self, doc: &mut D) -> RedoReport
    where
        D: PlanDocument + ?Sized,
    {
        let report = self.log.redo(doc, &self.factory);
        if report.regrouped_leaf_count > 0 || report.containers_recreated > 0 {
            self.notify(StructureChange::Redone);
        }
        report
    }

    fn notify(&self, change: StructureChange) {
        if let Some(observer) = &self.observer {
            observer.structure_changed(change);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
