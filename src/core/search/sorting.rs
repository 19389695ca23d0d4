//! Result ordering from request sort keys.

use crate::core::search::query::{ContentQuery, SortDirection, SortOrder};
use crate::core::types::Coordinates;

/// Orders a query by a requested sort key
pub trait SortingService: Send + Sync {
    /// Unknown or absent keys fall back to the service's default order
    fn order(
        &self,
        query: ContentQuery,
        sort_key: Option<&str>,
        coordinates: Option<Coordinates>,
        site: Option<&str>,
    ) -> ContentQuery;
}

/// Sorting over `key[,Ascending|Descending]` keys.
///
/// Keys: `title`/`name`, `updated`/`date`, `distance`, `relevance`/`score`.
#[derive(Debug, Clone)]
pub struct DefaultSorting {
    default_key: String,
}

impl Default for DefaultSorting {
    fn default() -> Self {
        Self::new("relevance")
    }
}

impl DefaultSorting {
    pub fn new(default_key: impl Into<String>) -> Self {
        Self {
            default_key: default_key.into(),
        }
    }
}

/// Parse a sort key; `None` for unknown keys and for distance without a point
pub fn parse_sort_key(key: &str, coordinates: Option<Coordinates>) -> Option<SortOrder> {
    let (name, direction) = match key.split_once(',') {
        Some((name, direction)) => (name.trim(), parse_direction(direction)),
        None => (key.trim(), None),
    };

    match name.to_ascii_lowercase().as_str() {
        "relevance" | "score" => Some(SortOrder::Relevance),
        "title" | "name" => Some(SortOrder::Name(
            direction.unwrap_or(SortDirection::Ascending),
        )),
        "updated" | "date" => Some(SortOrder::Updated(
            direction.unwrap_or(SortDirection::Descending),
        )),
        "distance" => coordinates.map(|from| SortOrder::Distance {
            from,
            direction: direction.unwrap_or(SortDirection::Ascending),
        }),
        _ => None,
    }
}

fn parse_direction(raw: &str) -> Option<SortDirection> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ascending" | "asc" => Some(SortDirection::Ascending),
        "descending" | "desc" => Some(SortDirection::Descending),
        _ => None,
    }
}

impl SortingService for DefaultSorting {
    fn order(
        &self,
        query: ContentQuery,
        sort_key: Option<&str>,
        coordinates: Option<Coordinates>,
        _site: Option<&str>,
    ) -> ContentQuery {
        let requested = sort_key
            .filter(|k| !k.trim().is_empty())
            .and_then(|k| {
                let order = parse_sort_key(k, coordinates);
                if order.is_none() {
                    tracing::debug!("Unrecognized sort key '{}', using default", k);
                }
                order
            });

        let order = requested
            .or_else(|| parse_sort_key(&self.default_key, coordinates))
            .unwrap_or_default();

        query.order_by(order)
    }
}
