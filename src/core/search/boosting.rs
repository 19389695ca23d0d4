//! Relevance boosting.
//!
//! Boosting only adds score to documents already admitted by the query.
//! [`ContentQuery::boost`] has no way to narrow membership, so a boosting
//! service cannot change which documents are returned.

use crate::core::config::BoostingConfig;
use crate::core::search::normalize::PhraseNormalizer;
use crate::core::search::predicate::{Field, Predicate};
use crate::core::search::query::ContentQuery;
use crate::core::types::Item;

/// Re-ranks a query using the request's scope items, phrase and page
pub trait BoostingService: Send + Sync {
    fn boost(
        &self,
        scope_items: &[Item],
        phrase: Option<&str>,
        context_item: Option<&Item>,
        query: ContentQuery,
    ) -> ContentQuery;
}

/// Boosting service that leaves queries unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoosting;

impl BoostingService for NoBoosting {
    fn boost(
        &self,
        _scope_items: &[Item],
        _phrase: Option<&str>,
        _context_item: Option<&Item>,
        query: ContentQuery,
    ) -> ContentQuery {
        query
    }
}

/// Boosts documents whose name contains phrase terms, and documents under
/// the page the search was issued from
#[derive(Debug, Clone)]
pub struct NameBoosting {
    normalizer: PhraseNormalizer,
    name_weight: f32,
    context_weight: f32,
}

impl NameBoosting {
    pub fn new(normalizer: PhraseNormalizer, name_weight: f32, context_weight: f32) -> Self {
        Self {
            normalizer,
            name_weight,
            context_weight,
        }
    }

    pub fn from_config(normalizer: PhraseNormalizer, config: &BoostingConfig) -> Self {
        Self::new(normalizer, config.name_weight, config.context_weight)
    }
}

impl BoostingService for NameBoosting {
    fn boost(
        &self,
        _scope_items: &[Item],
        phrase: Option<&str>,
        context_item: Option<&Item>,
        query: ContentQuery,
    ) -> ContentQuery {
        let normalized = self.normalizer.normalize(phrase);
        let mut query = query;

        for term in normalized.split_whitespace() {
            query = query.boost(Predicate::contains(Field::Name, term), self.name_weight);
        }

        if let Some(item) = context_item {
            query = query.boost(
                Predicate::eq(Field::RawPath, item.id.to_search_id()),
                self.context_weight,
            );
        }

        query
    }
}
