//! Scope resolution.
//!
//! A scope is a reference to one or more scope items. Each scope item
//! carries a scope query, a `;`-separated list of clauses such as
//! `+template:{id};-location:{id};sxacontent:offers`, which narrows the
//! documents a search may return. Clauses become [`ScopeToken`]s, tokens
//! become the base predicate of the content query.
//!
//! Scope queries are resolved under a fixed site context so that tenant
//! specific resolution on one site cannot leak into another;
//! [`SiteContextSwitcher`] restores the caller's site on every exit path.

use crate::core::content::ItemRepository;
use crate::core::error::Result;
use crate::core::search::predicate::{Field, Predicate};
use crate::core::types::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// How a token participates in the scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occurrence {
    Must,
    Should,
    MustNot,
}

/// One parsed scope query clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeToken {
    pub kind: String,
    pub value: String,
    pub occurrence: Occurrence,
}

impl ScopeToken {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, occurrence: Occurrence) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            occurrence,
        }
    }

    /// Predicate for this clause, ignoring its occurrence.
    ///
    /// `None` for kinds the index has no field for.
    pub fn to_predicate(&self) -> Option<Predicate> {
        match self.kind.to_ascii_lowercase().as_str() {
            "template" => Some(Predicate::eq(Field::Template, search_id(&self.value))),
            "location" => Some(Predicate::eq(Field::RawPath, search_id(&self.value))),
            "sxacontent" | "content" => {
                Some(Predicate::contains(Field::AggregatedContent, self.value.clone()))
            }
            "language" => Some(Predicate::eq(Field::Language, self.value.clone())),
            _ => None,
        }
    }
}

fn search_id(raw: &str) -> String {
    ItemId::parse(raw)
        .map(|id| id.to_search_id())
        .unwrap_or_else(|| raw.trim().to_ascii_lowercase())
}

/// Combine scope tokens into one predicate.
///
/// Must tokens are ANDed, the Should group is ORed and ANDed in, MustNot
/// tokens are ANDed negated. No tokens means no restriction.
pub fn scope_predicate(tokens: &[ScopeToken]) -> Predicate {
    let mut must = Vec::new();
    let mut should = Vec::new();
    let mut must_not = Vec::new();

    for token in tokens {
        let Some(predicate) = token.to_predicate() else {
            tracing::warn!(
                "Ignoring scope token with unsupported kind '{}'",
                token.kind
            );
            continue;
        };
        match token.occurrence {
            Occurrence::Must => must.push(predicate),
            Occurrence::Should => should.push(predicate),
            Occurrence::MustNot => must_not.push(predicate.negate()),
        }
    }

    let should = if should.is_empty() {
        Predicate::True
    } else {
        Predicate::any(should)
    };

    Predicate::all(must).and(should).and(Predicate::all(must_not))
}

/// Looks up scope items from a scope reference
pub trait ScopeItemLookup: Send + Sync {
    fn lookup(&self, scope: &str) -> Vec<Item>;
}

/// Parses a scope query field value into tokens
pub trait ScopeQueryParser: Send + Sync {
    fn parse(&self, raw: &str) -> Vec<ScopeToken>;
}

/// Rewrites placeholder tokens using the page a search was issued from
pub trait TokenResolver: Send + Sync {
    fn resolve(&self, tokens: Vec<ScopeToken>, context_item: Option<&Item>)
        -> Result<Vec<ScopeToken>>;
}

/// Scope lookup over `|`-separated item ids in a repository
pub struct RepositoryScopeLookup {
    repository: Arc<dyn ItemRepository>,
}

impl RepositoryScopeLookup {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

impl ScopeItemLookup for RepositoryScopeLookup {
    fn lookup(&self, scope: &str) -> Vec<Item> {
        scope
            .split('|')
            .filter_map(|raw| {
                let id = ItemId::parse(raw);
                if id.is_none() && !raw.trim().is_empty() {
                    tracing::debug!("Skipping malformed scope reference '{}'", raw);
                }
                id
            })
            .filter_map(|id| self.repository.get_item(&id))
            .collect()
    }
}

/// Parser for `[+|-]kind:value` clauses separated by `;`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedScopeParser;

impl ScopeQueryParser for DelimitedScopeParser {
    fn parse(&self, raw: &str) -> Vec<ScopeToken> {
        raw.split(';')
            .filter_map(|clause| {
                let clause = clause.trim();
                let (occurrence, rest) = if let Some(rest) = clause.strip_prefix('+') {
                    (Occurrence::Must, rest)
                } else if let Some(rest) = clause.strip_prefix('-') {
                    (Occurrence::MustNot, rest)
                } else {
                    (Occurrence::Should, clause)
                };
                let (kind, value) = rest.split_once(':')?;
                let (kind, value) = (kind.trim(), value.trim());
                if kind.is_empty() || value.is_empty() {
                    return None;
                }
                Some(ScopeToken::new(kind, value, occurrence))
            })
            .collect()
    }
}

pub const CURRENT_ITEM: &str = "$CurrentItem";
pub const CURRENT_TEMPLATE: &str = "$CurrentTemplate";

/// Resolves `$CurrentItem` and `$CurrentTemplate` from the context item.
///
/// Tokens whose placeholder cannot be resolved are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTokenResolver;

impl TokenResolver for PlaceholderTokenResolver {
    fn resolve(
        &self,
        tokens: Vec<ScopeToken>,
        context_item: Option<&Item>,
    ) -> Result<Vec<ScopeToken>> {
        let resolved = tokens
            .into_iter()
            .filter_map(|mut token| {
                let replacement = if token.value.eq_ignore_ascii_case(CURRENT_ITEM) {
                    Some(context_item.map(|item| item.id.to_search_id()))
                } else if token.value.eq_ignore_ascii_case(CURRENT_TEMPLATE) {
                    Some(context_item.and_then(|item| item.template.as_ref().map(ItemId::to_search_id)))
                } else {
                    None
                };

                match replacement {
                    None => Some(token),
                    Some(Some(value)) => {
                        token.value = value;
                        Some(token)
                    }
                    Some(None) => {
                        tracing::debug!(
                            "Dropping scope token {}:{} without a context item",
                            token.kind,
                            token.value
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(resolved)
    }
}

/// Active site of the hosting platform
pub trait SiteContext: Send + Sync {
    fn current(&self) -> String;
    fn switch_to(&self, site: &str);
}

/// Site context held in a lock
#[derive(Debug)]
pub struct SharedSiteContext {
    site: RwLock<String>,
}

impl SharedSiteContext {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: RwLock::new(site.into()),
        }
    }
}

impl SiteContext for SharedSiteContext {
    fn current(&self) -> String {
        match self.site.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn switch_to(&self, site: &str) {
        let mut guard = match self.site.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = site.to_string();
    }
}

/// Switches the site context and restores the previous site when dropped
pub struct SiteContextSwitcher<'a> {
    context: &'a dyn SiteContext,
    previous: String,
}

impl<'a> SiteContextSwitcher<'a> {
    pub fn enter(context: &'a dyn SiteContext, site: &str) -> Self {
        let previous = context.current();
        context.switch_to(site);
        Self { context, previous }
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }
}

impl Drop for SiteContextSwitcher<'_> {
    fn drop(&mut self) {
        self.context.switch_to(&self.previous);
    }
}

/// Turns scope references into scope tokens
pub struct ScopeResolver {
    lookup: Arc<dyn ScopeItemLookup>,
    parser: Arc<dyn ScopeQueryParser>,
    token_resolver: Arc<dyn TokenResolver>,
    scope_query_field: String,
}

impl ScopeResolver {
    pub fn new(
        lookup: Arc<dyn ScopeItemLookup>,
        parser: Arc<dyn ScopeQueryParser>,
        token_resolver: Arc<dyn TokenResolver>,
        scope_query_field: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            parser,
            token_resolver,
            scope_query_field: scope_query_field.into(),
        }
    }

    /// Scope items for a scope reference; none for an absent or blank one
    pub fn scope_items(&self, scope: Option<&str>) -> Vec<Item> {
        match scope {
            Some(s) if !s.trim().is_empty() => self.lookup.lookup(s),
            _ => Vec::new(),
        }
    }

    /// Parsed tokens of the given items, in item order then clause order
    pub fn parse_items(&self, items: &[Item]) -> Vec<ScopeToken> {
        items
            .iter()
            .filter_map(|item| item.field(&self.scope_query_field))
            .flat_map(|raw| self.parser.parse(raw))
            .collect()
    }

    /// Tokens for a scope reference, placeholders left unresolved
    pub fn resolve_scope(&self, scope: &str) -> Vec<ScopeToken> {
        self.parse_items(&self.lookup.lookup(scope))
    }

    /// Parse and resolve the tokens of `items` under `site`.
    ///
    /// The site context is switched for the duration of the call and
    /// restored afterwards, including when token resolution fails.
    pub fn resolve_scope_in(
        &self,
        context: &dyn SiteContext,
        site: &str,
        items: &[Item],
        context_item: Option<&Item>,
    ) -> Result<Vec<ScopeToken>> {
        let _switch = SiteContextSwitcher::enter(context, site);
        let tokens = self.parse_items(items);
        self.token_resolver.resolve(tokens, context_item)
    }
}
