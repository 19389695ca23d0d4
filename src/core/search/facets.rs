//! Facet filters from request parameters.

use crate::core::config::{FacetConfig, FacetKind};
use crate::core::search::predicate::Predicate;
use crate::core::search::query::ContentQuery;
use crate::core::types::Coordinates;
use std::collections::{BTreeMap, HashMap};

/// Narrows a query with facet selections taken from raw request parameters
pub trait FacetApplicator: Send + Sync {
    fn apply(
        &self,
        query: ContentQuery,
        params: &HashMap<String, String>,
        coordinates: Option<Coordinates>,
        site: Option<&str>,
    ) -> ContentQuery;
}

/// Facet applicator that leaves queries unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFacets;

impl FacetApplicator for NoFacets {
    fn apply(
        &self,
        query: ContentQuery,
        _params: &HashMap<String, String>,
        _coordinates: Option<Coordinates>,
        _site: Option<&str>,
    ) -> ContentQuery {
        query
    }
}

/// Facets defined in the `[facets.<param>]` configuration sections
#[derive(Debug, Clone, Default)]
pub struct ConfiguredFacets {
    facets: BTreeMap<String, FacetConfig>,
}

impl ConfiguredFacets {
    pub fn new(facets: BTreeMap<String, FacetConfig>) -> Self {
        Self { facets }
    }

    fn predicate(
        &self,
        param: &str,
        facet: &FacetConfig,
        raw: &str,
        coordinates: Option<Coordinates>,
    ) -> Option<Predicate> {
        match facet.kind {
            FacetKind::Value => {
                let field = facet.field?;
                let values: Vec<Predicate> = raw
                    .split([',', '|'])
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| Predicate::eq(field, v))
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(Predicate::any(values))
                }
            }
            FacetKind::Distance => {
                let Ok(radius) = raw.trim().parse::<f64>() else {
                    tracing::debug!("Ignoring distance facet '{}' with value '{}'", param, raw);
                    return None;
                };
                if !radius.is_finite() || radius < 0.0 {
                    return None;
                }
                let Some(center) = coordinates else {
                    tracing::debug!("Ignoring distance facet '{}' without coordinates", param);
                    return None;
                };
                Some(Predicate::within(center, radius))
            }
        }
    }
}

impl FacetApplicator for ConfiguredFacets {
    fn apply(
        &self,
        query: ContentQuery,
        params: &HashMap<String, String>,
        coordinates: Option<Coordinates>,
        site: Option<&str>,
    ) -> ContentQuery {
        let mut query = query;
        for (param, facet) in &self.facets {
            let Some(raw) = params.get(param) else {
                continue;
            };
            if let Some(predicate) = self.predicate(param, facet, raw, coordinates) {
                tracing::debug!("Facet '{}' on site {:?}: {}", param, site, predicate);
                query = query.filter(predicate);
            }
        }
        query
    }
}

/// Whether raw request parameters carry the geolocation marker
pub fn is_geolocation_request(params: &HashMap<String, String>, marker: &str) -> bool {
    params.keys().any(|k| k.eq_ignore_ascii_case(marker))
}
