//! Core domain logic (interface-agnostic)
//!
//! This module contains all search logic, independent of the CLI.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Item ids, items, search documents, requests
//! - **xdg**: XDG directory handling
//! - **content**: Item repository and content fixtures
//! - **language**: Known content languages
//! - **multisite**: Home, site and settings item resolution
//! - **search**: Query construction and the search orchestrator
//! - **storage**: Memory and Tantivy index backends
//! - **services**: Unified service container

pub mod config;
pub mod content;
pub mod error;
pub mod language;
pub mod multisite;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SiteSearchError};
pub use services::Services;
