//! Search index backends.
//!
//! The platform owns its indexes; the search layer only needs to run a
//! [`ContentQuery`] against one and get hits back. Two backends ship:
//!
//! - **MemoryIndex**: evaluates predicates directly over documents
//! - **TantivyIndex**: compiles predicates to tantivy queries (BM25)
//!
//! [`IndexRegistry`] maps sites to named indexes.

mod memory;
mod tantivy;

pub use memory::MemoryIndex;
pub use self::tantivy::{create_schema, TantivyIndex};

use crate::core::config::Config;
use crate::core::error::{Result, SiteSearchError};
use crate::core::search::ContentQuery;
use crate::core::types::{SearchDocument, SearchHit};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

/// A queryable search index
pub trait SearchIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Run a query, returning ranked and paged hits
    fn execute(&self, query: &ContentQuery) -> Result<Vec<SearchHit>>;
}

/// Resolves the index serving a site
pub trait IndexResolver: Send + Sync {
    /// Fails with [`SiteSearchError::IndexUnavailable`] when none is configured
    fn resolve(&self, site: Option<&str>) -> Result<Arc<dyn SearchIndex>>;
}

/// Index implementation to build documents into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBackend {
    #[default]
    Memory,
    Tantivy,
}

impl FromStr for IndexBackend {
    type Err = SiteSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "tantivy" => Ok(Self::Tantivy),
            other => Err(SiteSearchError::ConfigError(format!(
                "Unknown index backend '{other}'"
            ))),
        }
    }
}

/// Build an in-memory index of the given backend
pub fn build_index(
    backend: IndexBackend,
    name: &str,
    documents: Vec<SearchDocument>,
) -> Result<Arc<dyn SearchIndex>> {
    Ok(match backend {
        IndexBackend::Memory => Arc::new(MemoryIndex::new(name, documents)),
        IndexBackend::Tantivy => Arc::new(TantivyIndex::in_ram(name, &documents)?),
    })
}

/// Named indexes with per-site index selection
#[derive(Default)]
pub struct IndexRegistry {
    indexes: HashMap<String, Arc<dyn SearchIndex>>,
    site_indexes: BTreeMap<String, String>,
    default_index: String,
    default_site: Option<String>,
}

impl IndexRegistry {
    pub fn new(default_index: impl Into<String>) -> Self {
        Self {
            default_index: default_index.into(),
            ..Self::default()
        }
    }

    /// Registry with the site to index mapping from configuration
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new(config.index.default.clone());
        registry.default_site = config.multisite.default_site.clone();
        for (site, site_config) in &config.sites {
            if let Some(index) = &site_config.index {
                registry.site_indexes.insert(site.clone(), index.clone());
            }
        }
        registry
    }

    /// Add an index under its own name, replacing any previous one
    pub fn register(&mut self, index: Arc<dyn SearchIndex>) {
        self.indexes.insert(index.name().to_string(), index);
    }

    pub fn with_site_index(mut self, site: impl Into<String>, index: impl Into<String>) -> Self {
        self.site_indexes.insert(site.into(), index.into());
        self
    }

    /// Name of the index serving a site
    pub fn index_name(&self, site: Option<&str>) -> &str {
        site.filter(|s| !s.trim().is_empty())
            .or(self.default_site.as_deref())
            .and_then(|s| self.site_indexes.get(s))
            .map(String::as_str)
            .unwrap_or(&self.default_index)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchIndex>> {
        self.indexes.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl IndexResolver for IndexRegistry {
    fn resolve(&self, site: Option<&str>) -> Result<Arc<dyn SearchIndex>> {
        let name = self.index_name(site);
        self.get(name).ok_or_else(|| {
            SiteSearchError::IndexUnavailable(format!(
                "No search index '{name}' for site {}",
                site.unwrap_or("<default>")
            ))
        })
    }
}
