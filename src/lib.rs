//! sitesearch - Filtered, faceted site search for multisite content
//!
//! Builds one composed filter expression per search request from a
//! free-text phrase, a scope reference, a language selector, a
//! geolocation mode and facet parameters, runs it on a search index,
//! then sorts, pages and materializes the hits as content items.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - content, language, multisite (platform collaborators)
//!   - search (normalizer, predicates, scope, facets, boosting,
//!     sorting, orchestrator)
//!   - storage (memory and Tantivy indexes)
//!   - services (unified service container)
//!
//! - **cli**: Command-line interface over content fixtures
//!
//! # Key Features
//!
//! - Closed predicate algebra, evaluable and compilable to Tantivy
//! - Scope resolution under a scoped site-context guard
//! - Empty results instead of errors for missing sites and stale items

// Core domain logic
pub mod core;

// Command-line interface
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, SiteSearchError};
pub use core::search::{SearchResults, SearchService};
pub use core::services::Services;
pub use core::types::*;
