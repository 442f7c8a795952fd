//! Tree Command
//!
//! Print a document outline with node ids and kinds.
//!
//! Usage:
//!   planwrap tree <FILE>

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::config::Config;
use crate::types::Result;

pub fn run(file: &Path, config: Config) -> Result<()> {
    let ctx = CommandContext::load(file, config)?;
    let output = Output::new();

    output.header(&format!("{} ({} nodes)", file.display(), ctx.tree.len()));
    output.outline(&ctx.tree.render());
    Ok(())
}
