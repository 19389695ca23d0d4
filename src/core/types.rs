//! Core data types for the site-search service.
//!
//! Item identifiers, content items, the projected search documents the
//! index stores, and the request/hit types that flow through a search.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// Braces optional, dashes optional, case-insensitive
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\{?([0-9a-fA-F]{8})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{12})\}?$",
    )
    .expect("item id pattern is valid")
});

/// Platform item identifier (a GUID).
///
/// Stored as 32 lowercase hex digits, which is also the form the search
/// index uses for path and template fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier, accepting `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`
    /// with or without braces and dashes.
    ///
    /// Returns `None` for anything that is not GUID-shaped.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = ID_PATTERN.captures(raw.trim())?;
        let mut hex = String::with_capacity(32);
        for group in 1..=5 {
            hex.push_str(&caps[group]);
        }
        Some(Self(hex.to_ascii_lowercase()))
    }

    /// Check whether a raw string has the shape of an item id
    pub fn is_id(raw: &str) -> bool {
        ID_PATTERN.is_match(raw.trim())
    }

    /// Identifier as stored in the search index
    pub fn to_search_id(&self) -> String {
        self.0.clone()
    }

    /// Identifier as stored in the search index, borrowed
    pub fn as_search_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0.to_ascii_uppercase();
        write!(
            f,
            "{{{}-{}-{}-{}-{}}}",
            &h[0..8],
            &h[8..12],
            &h[12..16],
            &h[16..20],
            &h[20..32]
        )
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ItemId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid item id: {raw}")))
    }
}

/// A content item as stored by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    pub name: String,

    #[serde(default)]
    pub parent: Option<ItemId>,

    #[serde(default)]
    pub template: Option<ItemId>,

    /// Raw field values keyed by field name
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Item {
    /// Create an item with no parent, template or fields
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            template: None,
            fields: BTreeMap::new(),
        }
    }

    /// Raw value of a field, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Target ids of a multilist field (`|`-separated ids).
    ///
    /// Malformed entries are skipped. An absent field yields no targets.
    pub fn target_ids(&self, name: &str) -> Vec<ItemId> {
        self.field(name)
            .map(|raw| raw.split('|').filter_map(ItemId::parse).collect())
            .unwrap_or_default()
    }
}

/// Geographic point used by distance sorting and distance facets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Projected record stored in the search index for one item version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub item_id: ItemId,

    /// Ancestor-or-self search ids, root first
    #[serde(default)]
    pub raw_path: Vec<String>,

    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub is_searchable: bool,

    #[serde(default)]
    pub is_point_of_interest: bool,

    pub language: String,

    /// Full-text blob of all content fields
    #[serde(default)]
    pub aggregated_content: String,

    #[serde(default)]
    pub latest_version: bool,

    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub location: Option<Coordinates>,
}

/// Input bundle for one search call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Free-text phrase as typed by the visitor
    pub phrase: Option<String>,

    /// Scope reference (`|`-separated scope item ids)
    pub scope: Option<String>,

    /// Language selector (`,` or `|` separated)
    pub language: Option<String>,

    pub sort_order: Option<String>,

    /// Requested page size; zero or negative yields an empty page
    pub page_size: i64,

    /// Results to skip; negative is treated as zero
    pub offset: i64,

    pub coordinates: Option<Coordinates>,

    pub site: Option<String>,

    /// Identifier of the page the search was issued from
    pub context_item_id: Option<String>,

    /// Search only points of interest under the site item
    pub geolocation: bool,

    /// Raw request parameters, consumed by facets
    pub params: HashMap<String, String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            phrase: None,
            scope: None,
            language: None,
            sort_order: None,
            page_size: 20,
            offset: 0,
            coordinates: None,
            site: None,
            context_item_id: None,
            geolocation: false,
            params: HashMap::new(),
        }
    }
}

impl SearchRequest {
    /// Request for a phrase with every other parameter at its default
    pub fn for_phrase(phrase: impl Into<String>) -> Self {
        Self {
            phrase: Some(phrase.into()),
            ..Self::default()
        }
    }
}

/// One matching document as returned by an index, before materialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub item_id: ItemId,
    pub score: f32,
}
