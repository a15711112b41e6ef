//! Library side of the `labgrid` command-line tool.
//!
//! Commands are plain functions over loaded documents so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod config;
pub mod document;
pub mod logging;
pub mod summary;
pub mod types;
