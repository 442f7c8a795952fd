//! Wrap Command
//!
//! Run one wrap over a document and save the result.
//!
//! Usage:
//!   planwrap wrap <FILE> [--root <ID|NAME>] [--output <FILE|->] [--dry-run]

use std::path::PathBuf;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, resolve_root};
use crate::config::Config;
use crate::grouping::{GroupPlanner, WrapReport, WrapSession};
use crate::types::{NodeId, Result};

/// Wrap command options
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    pub file: PathBuf,
    pub root: Option<String>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn run(options: WrapOptions, config: Config) -> Result<()> {
    let output = Output::new();
    let report = execute(&options, config, &output)?;

    if options.dry_run {
        return Ok(());
    }
    if report.is_applied() {
        output.success(&report.to_string());
    } else {
        output.warning(&report.to_string());
    }
    Ok(())
}

/// Load, wrap, and save; returns the run report (empty for a dry run)
pub fn execute(options: &WrapOptions, config: Config, output: &Output) -> Result<WrapReport> {
    let mut ctx = CommandContext::load(&options.file, config)?;
    let root = resolve_root(&ctx.tree, options.root.as_deref())?;
    let mut session = WrapSession::new(ctx.config.grouping.clone());

    if options.dry_run {
        preview(&ctx, &session, root, output);
        return Ok(WrapReport::default());
    }

    let report = session.wrap(&mut ctx.tree, root);
    if report.is_applied()
        && let Some(path) = ctx.write(options.output.as_deref())?
    {
        output.info(&format!("Saved {}", path.display()));
    }
    Ok(report)
}

fn preview(ctx: &CommandContext, session: &WrapSession, root: NodeId, output: &Output) {
    match session.preview(&ctx.tree, root) {
        Ok(groups) => {
            let planner = GroupPlanner::new(session.config());
            output.section(&format!("{} group(s) would be created", groups.len()));
            for group in &groups {
                output.group(&planner.label_for(group), group);
            }
        }
        Err(reason) => output.warning(&format!("Nothing to wrap: {}", reason)),
    }
}
