//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/planwrap/config.toml)
//! 3. Project config (.planwrap/config.toml)
//! 4. Environment variables (PLANWRAP_*, highest priority)
//!
//! An explicit `--config <FILE>` replaces steps 2 to 4.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
