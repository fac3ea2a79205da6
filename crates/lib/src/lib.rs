//! agent-state-lib: persistent state and event log for long-running agents.
//!
//! This crate provides:
//! - `Scope`: a validated directory that owns one state file and one log file
//! - `StateStore`: the four operations agents use to save and recover progress
//! - `DirStore`: the filesystem implementation of `StateStore`
//! - `McpServer`: Model Context Protocol tool dispatch over any `StateStore`

pub mod consts;
pub mod mcp;
pub mod scope;
pub mod settings;
pub mod store;

pub use scope::Scope;
pub use settings::Settings;
pub use store::{DirStore, ErrorKind, StateStore, StoreError, saturating_num_chars, tail_chars};
