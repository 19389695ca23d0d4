//! Search orchestration.
//!
//! [`SearchService::search`] runs the whole pipeline for one request:
//!
//! 1. Resolve the index serving the site
//! 2. Resolve the context item and the scope items
//! 3. Build the scoped base query under the shell site context
//! 4. AND in the site, content, language and latest-version predicates
//! 5. Apply facets
//! 6. Apply boosting
//! 7. Apply sort order
//! 8. Page
//! 9. Execute and materialize hits, dropping stale ones
//!
//! Only index resolution failures surface as errors; every other gap
//! (missing home item, unknown language, malformed context id, deleted
//! item) degrades to fewer results.

use crate::core::content::ItemRepository;
use crate::core::error::Result;
use crate::core::search::boosting::{BoostingService, NoBoosting};
use crate::core::search::builder::PredicateBuilder;
use crate::core::search::facets::{FacetApplicator, NoFacets};
use crate::core::search::normalize::PhraseNormalizer;
use crate::core::search::query::ContentQuery;
use crate::core::search::scope::{scope_predicate, ScopeResolver, SharedSiteContext, SiteContext};
use crate::core::search::sorting::{DefaultSorting, SortingService};
use crate::core::storage::{IndexResolver, SearchIndex};
use crate::core::types::{Item, ItemId, SearchHit, SearchRequest};
use std::sync::Arc;

pub const DEFAULT_SHELL_SITE: &str = "shell";

/// Search orchestrator
pub struct SearchService {
    indexes: Arc<dyn IndexResolver>,
    repository: Arc<dyn ItemRepository>,
    scope: ScopeResolver,
    predicates: PredicateBuilder,
    facets: Arc<dyn FacetApplicator>,
    boosting: Arc<dyn BoostingService>,
    sorting: Arc<dyn SortingService>,
    site_context: Arc<dyn SiteContext>,
    normalizer: PhraseNormalizer,
    shell_site: String,
    max_page_size: Option<usize>,
}

impl SearchService {
    /// Service without facets or boosting, sorting by relevance
    pub fn new(
        indexes: Arc<dyn IndexResolver>,
        repository: Arc<dyn ItemRepository>,
        scope: ScopeResolver,
        predicates: PredicateBuilder,
    ) -> Self {
        Self {
            indexes,
            repository,
            scope,
            predicates,
            facets: Arc::new(NoFacets),
            boosting: Arc::new(NoBoosting),
            sorting: Arc::new(DefaultSorting::default()),
            site_context: Arc::new(SharedSiteContext::new(DEFAULT_SHELL_SITE)),
            normalizer: PhraseNormalizer::default(),
            shell_site: DEFAULT_SHELL_SITE.to_string(),
            max_page_size: None,
        }
    }

    pub fn with_facets(mut self, facets: Arc<dyn FacetApplicator>) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_boosting(mut self, boosting: Arc<dyn BoostingService>) -> Self {
        self.boosting = boosting;
        self
    }

    pub fn with_sorting(mut self, sorting: Arc<dyn SortingService>) -> Self {
        self.sorting = sorting;
        self
    }

    /// Site context switched to `shell_site` while scope tokens resolve
    pub fn with_site_context(
        mut self,
        site_context: Arc<dyn SiteContext>,
        shell_site: impl Into<String>,
    ) -> Self {
        self.site_context = site_context;
        self.shell_site = shell_site.into();
        self
    }

    pub fn with_normalizer(mut self, normalizer: PhraseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Cap requested page sizes; uncapped unless set
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = Some(max_page_size);
        self
    }

    pub fn max_page_size(&self) -> Option<usize> {
        self.max_page_size
    }

    /// Execute a search, yielding content items lazily
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        let (index, query) = self.prepare(request)?;

        let hits = if query.is_empty_page() {
            Vec::new()
        } else {
            index.execute(&query)?
        };
        tracing::debug!("Index '{}' returned {} hits", index.name(), hits.len());

        Ok(SearchResults::new(hits, Arc::clone(&self.repository)))
    }

    /// Compose the query for a request without executing it.
    ///
    /// Returns the query and the name of the index it would run on.
    pub fn query(&self, request: &SearchRequest) -> Result<(ContentQuery, String)> {
        let (index, query) = self.prepare(request)?;
        Ok((query, index.name().to_string()))
    }

    fn prepare(&self, request: &SearchRequest) -> Result<(Arc<dyn SearchIndex>, ContentQuery)> {
        let site = request.site.as_deref();

        let index = self.indexes.resolve(site)?;

        let context_item = self.context_item(request.context_item_id.as_deref());
        let scope_items = self.scope.scope_items(request.scope.as_deref());

        let tokens = self.scope.resolve_scope_in(
            self.site_context.as_ref(),
            &self.shell_site,
            &scope_items,
            context_item.as_ref(),
        )?;
        let mut query = ContentQuery::new(scope_predicate(&tokens));

        let normalized = self.normalizer.normalize(request.phrase.as_deref());
        query = query.filter(self.predicates.compose(request, &normalized));

        query = self
            .facets
            .apply(query, &request.params, request.coordinates, site);

        query = self.apply_boosting(&scope_items, request, context_item.as_ref(), query);

        query = self.sorting.order(
            query,
            request.sort_order.as_deref(),
            request.coordinates,
            site,
        );

        query = query
            .skip(request.offset.max(0) as usize)
            .take(self.page_size(request.page_size));

        tracing::debug!(
            "Search query for site {:?}: {} (order: {:?}, skip: {}, take: {:?})",
            site,
            query.predicate(),
            query.order(),
            query.skip_count(),
            query.take_count()
        );

        Ok((index, query))
    }

    /// Boosting may only add score; its filter and order are discarded
    fn apply_boosting(
        &self,
        scope_items: &[Item],
        request: &SearchRequest,
        context_item: Option<&Item>,
        query: ContentQuery,
    ) -> ContentQuery {
        let boosted = self.boosting.boost(
            scope_items,
            request.phrase.as_deref(),
            context_item,
            query.clone(),
        );

        if boosted.predicate() != query.predicate() {
            tracing::warn!("Boosting service changed query membership; keeping boosts only");
        }

        query.with_boosts(boosted.boosts().to_vec())
    }

    fn context_item(&self, raw: Option<&str>) -> Option<Item> {
        let raw = raw.filter(|r| !r.trim().is_empty())?;
        let Some(id) = ItemId::parse(raw) else {
            tracing::debug!("Ignoring malformed context item id '{}'", raw);
            return None;
        };
        self.repository.get_item(&id)
    }

    fn page_size(&self, requested: i64) -> usize {
        if requested <= 0 {
            return 0;
        }
        let requested = usize::try_from(requested).unwrap_or(usize::MAX);
        match self.max_page_size {
            Some(max) if requested > max => {
                tracing::debug!("Page size {} capped to {}", requested, max);
                max
            }
            _ => requested,
        }
    }
}

/// Lazily materialized search results.
///
/// Yields each hit's content item in rank order, skipping hits whose item
/// no longer exists. Single pass.
pub struct SearchResults {
    hits: std::vec::IntoIter<SearchHit>,
    repository: Arc<dyn ItemRepository>,
}

impl SearchResults {
    fn new(hits: Vec<SearchHit>, repository: Arc<dyn ItemRepository>) -> Self {
        Self {
            hits: hits.into_iter(),
            repository,
        }
    }

    /// Hits not yet materialized
    pub fn remaining_hits(&self) -> &[SearchHit] {
        self.hits.as_slice()
    }
}

impl Iterator for SearchResults {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        for hit in self.hits.by_ref() {
            match self.repository.get_item(&hit.item_id) {
                Some(item) => return Some(item),
                None => tracing::debug!("Dropping stale index entry {}", hit.item_id),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.hits.len()))
    }
}

impl std::iter::FusedIterator for SearchResults {}
