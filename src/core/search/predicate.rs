//! Boolean filter predicates over search documents.
//!
//! A closed algebra instead of opaque closures: predicates can be
//! evaluated against a [`SearchDocument`], rendered as a filter string for
//! logs, serialized, and compiled by an index backend into its native
//! query type.
//!
//! `And`/`Or` built through [`Predicate::and`] and [`Predicate::or`] fold
//! the constants away, so `False` absorbs a conjunction and `True` absorbs
//! a disjunction.

use crate::core::types::{Coordinates, SearchDocument};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document fields a predicate can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ItemId,
    RawPath,
    Template,
    Name,
    IsSearchable,
    IsPointOfInterest,
    Language,
    AggregatedContent,
    LatestVersion,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::ItemId,
        Field::RawPath,
        Field::Template,
        Field::Name,
        Field::IsSearchable,
        Field::IsPointOfInterest,
        Field::Language,
        Field::AggregatedContent,
        Field::LatestVersion,
    ];

    /// Field name as used in filter strings and index schemas
    pub fn name(&self) -> &'static str {
        match self {
            Field::ItemId => "item_id",
            Field::RawPath => "raw_path",
            Field::Template => "template",
            Field::Name => "name",
            Field::IsSearchable => "is_searchable",
            Field::IsPointOfInterest => "is_point_of_interest",
            Field::Language => "language",
            Field::AggregatedContent => "aggregated_content",
            Field::LatestVersion => "latest_version",
        }
    }

    /// Look a field up by its name
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the field holds a boolean flag
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Field::IsSearchable | Field::IsPointOfInterest | Field::LatestVersion
        )
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Any value of the field equals the operand (ASCII case-insensitive)
    Eq,
    /// Any value of the field contains the operand (case-insensitive)
    Contains,
}

/// Comparison operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Composable boolean filter over [`SearchDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    True,
    False,
    Compare { field: Field, op: Op, value: Value },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    /// Document location lies within `radius_km` of `center`
    Within { center: Coordinates, radius_km: f64 },
}

impl Predicate {
    /// `field == value`
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            field,
            op: Op::Eq,
            value: value.into(),
        }
    }

    /// `field contains text`
    pub fn contains(field: Field, text: impl Into<String>) -> Self {
        Predicate::Compare {
            field,
            op: Op::Contains,
            value: Value::Text(text.into()),
        }
    }

    /// `flag == true`
    pub fn flag(field: Field) -> Self {
        Predicate::eq(field, true)
    }

    pub fn within(center: Coordinates, radius_km: f64) -> Self {
        Predicate::Within { center, radius_km }
    }

    /// Conjunction, folding constants
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::True, p) | (p, Predicate::True) => p,
            (l, r) => Predicate::And(Box::new(l), Box::new(r)),
        }
    }

    /// Disjunction, folding constants
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::False, p) | (p, Predicate::False) => p,
            (l, r) => Predicate::Or(Box::new(l), Box::new(r)),
        }
    }

    /// Negation, folding constants and double negation
    pub fn negate(self) -> Predicate {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }

    /// AND of every predicate; `True` when empty
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates.into_iter().fold(Predicate::True, Predicate::and)
    }

    /// OR of every predicate; `False` when empty
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates.into_iter().fold(Predicate::False, Predicate::or)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Predicate::False)
    }

    /// Evaluate the predicate against a document
    pub fn matches(&self, doc: &SearchDocument) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Compare { field, op, value } => compare(doc, *field, *op, value),
            Predicate::And(l, r) => l.matches(doc) && r.matches(doc),
            Predicate::Or(l, r) => l.matches(doc) || r.matches(doc),
            Predicate::Not(p) => !p.matches(doc),
            Predicate::Within { center, radius_km } => doc
                .location
                .map(|loc| center.distance_km(&loc) <= *radius_km)
                .unwrap_or(false),
        }
    }
}

fn text_values(doc: &SearchDocument, field: Field) -> Vec<&str> {
    match field {
        Field::ItemId => vec![doc.item_id.as_search_id()],
        Field::RawPath => doc.raw_path.iter().map(String::as_str).collect(),
        Field::Template => doc.template.as_deref().into_iter().collect(),
        Field::Name => vec![doc.name.as_str()],
        Field::Language => vec![doc.language.as_str()],
        Field::AggregatedContent => vec![doc.aggregated_content.as_str()],
        Field::IsSearchable | Field::IsPointOfInterest | Field::LatestVersion => Vec::new(),
    }
}

fn flag_value(doc: &SearchDocument, field: Field) -> Option<bool> {
    match field {
        Field::IsSearchable => Some(doc.is_searchable),
        Field::IsPointOfInterest => Some(doc.is_point_of_interest),
        Field::LatestVersion => Some(doc.latest_version),
        _ => None,
    }
}

fn compare(doc: &SearchDocument, field: Field, op: Op, value: &Value) -> bool {
    match (op, value) {
        (Op::Eq, Value::Bool(expected)) => flag_value(doc, field) == Some(*expected),
        (Op::Eq, Value::Text(expected)) => text_values(doc, field)
            .iter()
            .any(|v| v.eq_ignore_ascii_case(expected)),
        (Op::Contains, Value::Text(needle)) => {
            let needle = needle.to_lowercase();
            text_values(doc, field)
                .iter()
                .any(|v| v.to_lowercase().contains(&needle))
        }
        (Op::Contains, Value::Bool(_)) => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => write!(f, "*:*"),
            Predicate::False => write!(f, "-*:*"),
            Predicate::Compare {
                field,
                op: Op::Eq,
                value,
            } => write!(f, "{}:{}", field.name(), value),
            Predicate::Compare {
                field,
                op: Op::Contains,
                value,
            } => write!(f, "{}:~{}", field.name(), value),
            Predicate::And(l, r) => write!(f, "({l} AND {r})"),
            Predicate::Or(l, r) => write!(f, "({l} OR {r})"),
            Predicate::Not(p) => write!(f, "NOT {p}"),
            Predicate::Within { center, radius_km } => write!(
                f,
                "within({}, {}, {}km)",
                center.latitude, center.longitude, radius_km
            ),
        }
    }
}
