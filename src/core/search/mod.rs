//! Query construction and search orchestration.
//!
//! This module turns a search request into a [`ContentQuery`]: a scope
//! predicate from the request's scope items, site/content/language/version
//! predicates, facets, boosts, an order and a page. [`SearchService`] runs
//! the finished query on an index and materializes content items.

pub mod boosting;
pub mod builder;
pub mod facets;
pub mod normalize;
pub mod predicate;
pub mod query;
pub mod scope;
pub mod service;
pub mod sorting;

pub use boosting::{BoostingService, NameBoosting, NoBoosting};
pub use builder::PredicateBuilder;
pub use facets::{is_geolocation_request, ConfiguredFacets, FacetApplicator, NoFacets};
pub use normalize::{normalize_phrase, PhraseNormalizer, RESERVED_CHARACTERS};
pub use predicate::{Field, Op, Predicate, Value};
pub use query::{Boost, ContentQuery, SortDirection, SortOrder};
pub use scope::{
    scope_predicate, DelimitedScopeParser, Occurrence, PlaceholderTokenResolver,
    RepositoryScopeLookup, ScopeItemLookup, ScopeQueryParser, ScopeResolver, ScopeToken,
    SharedSiteContext, SiteContext, SiteContextSwitcher, TokenResolver,
};
pub use service::{SearchResults, SearchService};
pub use sorting::{parse_sort_key, DefaultSorting, SortingService};
