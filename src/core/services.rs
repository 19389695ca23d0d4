//! Unified service container for sitesearch
//!
//! Wires the search collaborators from configuration.

use crate::core::config::Config;
use crate::core::content::{ContentFixture, ItemRepository};
use crate::core::error::Result;
use crate::core::language::StaticLanguageRegistry;
use crate::core::multisite::SiteTree;
use crate::core::search::{
    BoostingService, ConfiguredFacets, DefaultSorting, DelimitedScopeParser, NameBoosting,
    NoBoosting, PhraseNormalizer, PlaceholderTokenResolver, PredicateBuilder,
    RepositoryScopeLookup, ScopeResolver, SearchService, SharedSiteContext,
};
use crate::core::storage::{build_index, IndexBackend, IndexRegistry};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Content items backing materialization and site resolution
    pub repository: Arc<dyn ItemRepository>,

    /// Platform site context switched during scope resolution
    pub site_context: Arc<SharedSiteContext>,

    /// Search orchestrator
    pub search: Arc<SearchService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, content and indexes
    pub fn new(
        config: Config,
        repository: Arc<dyn ItemRepository>,
        indexes: IndexRegistry,
    ) -> Self {
        let normalizer = config
            .search
            .reserved_characters
            .as_deref()
            .map(PhraseNormalizer::with_characters)
            .unwrap_or_default();

        let tree = Arc::new(SiteTree::from_config(Arc::clone(&repository), &config));
        let languages = Arc::new(StaticLanguageRegistry::new(config.languages.known.clone()));

        let scope = ScopeResolver::new(
            Arc::new(RepositoryScopeLookup::new(Arc::clone(&repository))),
            Arc::new(DelimitedScopeParser),
            Arc::new(PlaceholderTokenResolver),
            config.search.scope_query_field.clone(),
        );

        let predicates = PredicateBuilder::new(
            tree.clone(),
            tree.clone(),
            tree,
            Arc::clone(&repository),
            languages,
        )
        .with_association_fields(
            config.search.associated_content_field.clone(),
            config.search.associated_media_field.clone(),
        );

        let boosting: Arc<dyn BoostingService> = if config.boosting.enabled {
            Arc::new(NameBoosting::from_config(normalizer.clone(), &config.boosting))
        } else {
            Arc::new(NoBoosting)
        };

        let initial_site = config
            .multisite
            .default_site
            .clone()
            .unwrap_or_else(|| config.search.shell_site.clone());
        let site_context = Arc::new(SharedSiteContext::new(initial_site));

        let mut search =
            SearchService::new(Arc::new(indexes), Arc::clone(&repository), scope, predicates)
                .with_facets(Arc::new(ConfiguredFacets::new(config.facets.clone())))
                .with_boosting(boosting)
                .with_sorting(Arc::new(DefaultSorting::new(config.sorting.default.clone())))
                .with_site_context(site_context.clone(), config.search.shell_site.clone())
                .with_normalizer(normalizer);
        if let Some(max) = config.search.max_page_size {
            search = search.with_max_page_size(max);
        }

        Self {
            repository,
            site_context,
            search: Arc::new(search),
            config: Arc::new(config),
        }
    }

    /// Create services over a content fixture.
    ///
    /// The fixture's documents are indexed once per configured index name
    /// (the default index and every per-site index).
    pub fn from_fixture(
        config: Config,
        fixture: &ContentFixture,
        backend: IndexBackend,
    ) -> Result<Self> {
        let mut names: BTreeSet<String> = BTreeSet::new();
        names.insert(config.index.default.clone());
        names.extend(config.sites.values().filter_map(|s| s.index.clone()));

        let mut registry = IndexRegistry::from_config(&config);
        for name in &names {
            registry.register(build_index(backend, name, fixture.documents.clone())?);
        }
        tracing::debug!(
            "Indexed {} documents into {:?} ({:?})",
            fixture.documents.len(),
            names,
            backend
        );

        let repository: Arc<dyn ItemRepository> = Arc::new(fixture.repository());
        Ok(Self::new(config, repository, registry))
    }
}
