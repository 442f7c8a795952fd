//! Session Command
//!
//! Interactive wrap/undo/redo over one open document, one command per line.
//!
//! Usage:
//!   planwrap session <FILE> [--root <ID|NAME>]
//!
//! Commands: `wrap [root]`, `preview [root]`, `undo`, `redo`, `tree`,
//! `save [path]`, `help`, `quit`.

use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, resolve_root};
use crate::config::Config;
use crate::grouping::{GroupPlanner, StructureChange, StructureObserver, WrapSession};
use crate::types::{NodeId, Result};

const HELP: &str = "\
wrap [root]      group similar requests under root (default: session root)
preview [root]   show the groups a wrap would create
undo             revert the last wrap
redo             re-apply the last undone wrap
tree             print the document outline
save [path]      write the document (default: the opened file, '-' for stdout)
help             show this help
quit             leave the session";

// =============================================================================
// Command Parsing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Wrap(Option<String>),
    Preview(Option<String>),
    Undo,
    Redo,
    Tree,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match verb.to_lowercase().as_str() {
            "wrap" | "w" => Ok(Self::Wrap(arg.map(String::from))),
            "preview" | "p" => Ok(Self::Preview(arg.map(String::from))),
            "undo" | "u" => Ok(Self::Undo),
            "redo" | "r" => Ok(Self::Redo),
            "tree" | "t" => Ok(Self::Tree),
            "save" | "s" => Ok(Self::Save(arg.map(PathBuf::from))),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("Unknown command '{}', try 'help'", other)),
        }
    }
}

// =============================================================================
// Shell
// =============================================================================

/// Result of one session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Done(String),
    Skipped(String),
    Text(String),
    Quit,
}

/// Tracks whether the document changed since the last save
#[derive(Debug, Clone, Default)]
struct DirtyFlag(Rc<Cell<bool>>);

impl StructureObserver for DirtyFlag {
    fn structure_changed(&self, change: StructureChange) {
        debug!("Document changed: {:?}", change);
        self.0.set(true);
    }
}

/// One open document with its wrap session
pub struct SessionShell {
    ctx: CommandContext,
    root: NodeId,
    session: WrapSession,
    dirty: DirtyFlag,
}

impl SessionShell {
    pub fn open(file: &Path, root: Option<&str>, config: Config) -> Result<Self> {
        let ctx = CommandContext::load(file, config)?;
        let root = resolve_root(&ctx.tree, root)?;
        let dirty = DirtyFlag::default();
        let session = WrapSession::new(ctx.config.grouping.clone()).with_observer(dirty.clone());
        debug!("Opened session {} on {}", session.id(), file.display());

        Ok(Self {
            ctx,
            root,
            session,
            dirty,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.0.get()
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    pub fn execute(&mut self, command: SessionCommand) -> Result<Reply> {
        let reply = match command {
            SessionCommand::Wrap(selector) => {
                let root = self.root_for(selector.as_deref())?;
                let report = self.session.wrap(&mut self.ctx.tree, root);
                if report.is_applied() {
                    Reply::Done(report.to_string())
                } else {
                    Reply::Skipped(report.to_string())
                }
            }
            SessionCommand::Preview(selector) => {
                let root = self.root_for(selector.as_deref())?;
                match self.session.preview(&self.ctx.tree, root) {
                    Ok(groups) => {
                        let planner = GroupPlanner::new(self.session.config());
                        let lines: Vec<String> = groups
                            .iter()
                            .map(|g| format!("{} ({})", planner.label_for(g), g.len()))
                            .collect();
                        Reply::Text(lines.join("\n"))
                    }
                    Err(reason) => Reply::Skipped(format!("Nothing to wrap: {}", reason)),
                }
            }
            SessionCommand::Undo => {
                let report = self.session.undo(&mut self.ctx.tree);
                if report.restored_leaf_count > 0 {
                    Reply::Done(report.to_string())
                } else {
                    Reply::Skipped(report.to_string())
                }
            }
            SessionCommand::Redo => {
                let report = self.session.redo(&mut self.ctx.tree);
                if report.regrouped_leaf_count > 0 {
                    Reply::Done(report.to_string())
                } else {
                    Reply::Skipped(report.to_string())
                }
            }
            SessionCommand::Tree => Reply::Text(self.ctx.tree.render()),
            SessionCommand::Save(path) => {
                let written = self.ctx.write(path.as_deref())?;
                self.dirty.0.set(false);
                match written {
                    Some(path) => Reply::Done(format!("Saved {}", path.display())),
                    None => Reply::Text(String::new()),
                }
            }
            SessionCommand::Help => Reply::Text(HELP.to_string()),
            SessionCommand::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    fn root_for(&self, selector: Option<&str>) -> Result<NodeId> {
        match selector {
            Some(selector) => resolve_root(&self.ctx.tree, Some(selector)),
            None => Ok(self.root),
        }
    }
}

// =============================================================================
// Loop
// =============================================================================

pub fn run(file: &Path, root: Option<&str>, config: Config) -> Result<()> {
    let output = Output::new();
    let mut shell = SessionShell::open(file, root, config)?;

    output.header(&format!("planwrap session: {}", file.display()));
    output.info("Type 'help' for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        output.prompt();
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                output.error(&e);
                continue;
            }
        };

        match shell.execute(command) {
            Ok(Reply::Done(message)) => output.success(&message),
            Ok(Reply::Skipped(message)) => output.warning(&message),
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => output.outline(&text),
            Ok(Reply::Quit) => break,
            Err(e) => output.error(&e.to_string()),
        }
    }

    if shell.is_dirty() {
        output.warning("Unsaved changes discarded");
    }
    Ok(())
}
