//! Nautilus Core: in-memory filesystem and command interpreter
//!
//! This crate provides the node tree, the owner/other permission model,
//! path resolution and the built-in shell commands. Front ends feed lines
//! to a [`Shell`] and read its output.

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod mode;
pub mod path;
pub mod permissions;
pub mod session;
pub mod shell;
pub mod tree;

// Re-export key types for convenience
pub use config::{ConfigError, ShellConfig};
pub use error::{ShellError, ShellResult};
pub use mode::{Mode, ModeChange};
pub use path::FsPath;
pub use session::Session;
pub use shell::{Flow, Shell};
pub use tree::{FsTree, Node, NodeId};
