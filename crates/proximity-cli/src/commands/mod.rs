//! CLI command implementations

pub mod author;
pub mod circles;
pub mod completions;
pub mod config;
pub mod guides;
