//! Test-plan document model
//!
//! - `document`: [`PlanDocument`] interface and the arena-backed [`PlanTree`]
//! - `format`: JSON/YAML outline files

mod document;
mod format;

pub use document::{PlanDocument, PlanTree};
pub use format::{DocumentFormat, NodeSpec};
