//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod config;
pub mod normalize;
pub mod search;

// Re-export argument types for use in mod.rs
pub use config::ConfigArgs;
pub use normalize::NormalizeArgs;
pub use search::SearchArgs;
