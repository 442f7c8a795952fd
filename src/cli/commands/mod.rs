pub mod config;
pub mod session;
pub mod tree;
pub mod wrap;
