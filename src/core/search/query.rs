//! The content query threaded through a search.
//!
//! Each pipeline stage takes a [`ContentQuery`] and returns a narrowed,
//! boosted or ordered copy of it. Nothing executes until an index runs
//! the finished query; index backends share [`ContentQuery::rank`] so
//! boosting, ordering and paging behave the same everywhere.

use crate::core::search::predicate::Predicate;
use crate::core::types::{Coordinates, SearchDocument, SearchHit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Result ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Highest score first
    Relevance,
    Name(SortDirection),
    Updated(SortDirection),
    /// By distance from a point; documents without a location go last
    Distance {
        from: Coordinates,
        direction: SortDirection,
    },
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Relevance
    }
}

/// Score added to documents matching a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub predicate: Predicate,
    pub weight: f32,
}

/// Composed, not yet executed, content query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentQuery {
    scope: Predicate,
    filter: Predicate,
    boosts: Vec<Boost>,
    order: SortOrder,
    skip: usize,
    take: Option<usize>,
}

impl Default for ContentQuery {
    fn default() -> Self {
        Self::new(Predicate::True)
    }
}

impl ContentQuery {
    /// Query over everything the scope predicate admits
    pub fn new(scope: Predicate) -> Self {
        Self {
            scope,
            filter: Predicate::True,
            boosts: Vec::new(),
            order: SortOrder::Relevance,
            skip: 0,
            take: None,
        }
    }

    /// AND another predicate onto the filter
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = self.filter.and(predicate);
        self
    }

    /// Add a boost; boosts change scores, never membership
    pub fn boost(mut self, predicate: Predicate, weight: f32) -> Self {
        if !predicate.is_false() && weight != 0.0 {
            self.boosts.push(Boost { predicate, weight });
        }
        self
    }

    pub fn order_by(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn skip(mut self, count: usize) -> Self {
        self.skip = count;
        self
    }

    pub fn take(mut self, count: usize) -> Self {
        self.take = Some(count);
        self
    }

    /// Replace every boost
    pub fn with_boosts(mut self, boosts: Vec<Boost>) -> Self {
        self.boosts = boosts;
        self
    }

    pub fn scope(&self) -> &Predicate {
        &self.scope
    }

    pub fn filter_predicate(&self) -> &Predicate {
        &self.filter
    }

    /// Full membership predicate: scope AND filter
    pub fn predicate(&self) -> Predicate {
        self.scope.clone().and(self.filter.clone())
    }

    pub fn boosts(&self) -> &[Boost] {
        &self.boosts
    }

    pub fn order(&self) -> &SortOrder {
        &self.order
    }

    pub fn skip_count(&self) -> usize {
        self.skip
    }

    pub fn take_count(&self) -> Option<usize> {
        self.take
    }

    /// Whether the page is empty by construction
    pub fn is_empty_page(&self) -> bool {
        self.take == Some(0)
    }

    pub fn matches(&self, doc: &SearchDocument) -> bool {
        self.scope.matches(doc) && self.filter.matches(doc)
    }

    /// Filter, boost, order and page candidate documents.
    ///
    /// `candidates` carry the backend's base relevance score. Candidates
    /// that do not match the query are dropped, so backends may pass a
    /// superset.
    pub fn rank(&self, candidates: Vec<(SearchDocument, f32)>) -> Vec<SearchHit> {
        let matching = candidates
            .into_iter()
            .filter(|(doc, _)| self.matches(doc))
            .collect();
        self.rank_matching(matching)
    }

    /// Boost, order and page candidates already known to match the query
    pub fn rank_matching(&self, candidates: Vec<(SearchDocument, f32)>) -> Vec<SearchHit> {
        if self.is_empty_page() {
            return Vec::new();
        }

        let mut scored: Vec<(SearchDocument, f32)> = candidates
            .into_iter()
            .map(|(doc, base)| {
                let boost: f32 = self
                    .boosts
                    .iter()
                    .filter(|b| b.predicate.matches(&doc))
                    .map(|b| b.weight)
                    .sum();
                (doc, base + boost)
            })
            .collect();

        scored.sort_by(|a, b| {
            self.compare(a, b)
                .then_with(|| a.0.item_id.cmp(&b.0.item_id))
        });

        let page = scored.into_iter().skip(self.skip);
        let page: Vec<(SearchDocument, f32)> = match self.take {
            Some(n) => page.take(n).collect(),
            None => page.collect(),
        };

        page.into_iter()
            .map(|(doc, score)| SearchHit {
                item_id: doc.item_id,
                score,
            })
            .collect()
    }

    fn compare(&self, a: &(SearchDocument, f32), b: &(SearchDocument, f32)) -> Ordering {
        match &self.order {
            SortOrder::Relevance => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
            SortOrder::Name(direction) => directed(
                a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase()),
                *direction,
            ),
            SortOrder::Updated(direction) => {
                missing_last(a.0.updated.as_ref(), b.0.updated.as_ref(), *direction, |x, y| {
                    x.cmp(y)
                })
            }
            SortOrder::Distance { from, direction } => {
                let da = a.0.location.map(|loc| from.distance_km(&loc));
                let db = b.0.location.map(|loc| from.distance_km(&loc));
                missing_last(da.as_ref(), db.as_ref(), *direction, |x, y| {
                    x.partial_cmp(y).unwrap_or(Ordering::Equal)
                })
            }
        }
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn missing_last<T>(
    a: Option<&T>,
    b: Option<&T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(cmp(x, y), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
