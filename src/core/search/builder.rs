//! Filter predicates composed for every search.
//!
//! The base predicate restricts results to the requesting site: either
//! pages and media under the site's home item, or points of interest
//! under the site item in geolocation mode. Content, language and
//! latest-version predicates are ANDed on top.

use crate::core::content::ItemRepository;
use crate::core::language::LanguageRegistry;
use crate::core::multisite::{HomeItemResolver, SettingsItemResolver, SiteItemResolver};
use crate::core::search::predicate::{Field, Predicate};
use crate::core::types::{ItemId, SearchRequest};
use std::sync::Arc;

pub const DEFAULT_ASSOCIATED_CONTENT_FIELD: &str = "AssociatedContent";
pub const DEFAULT_ASSOCIATED_MEDIA_FIELD: &str = "AssociatedMedia";

/// Builds the site, content, language and version predicates
pub struct PredicateBuilder {
    homes: Arc<dyn HomeItemResolver>,
    sites: Arc<dyn SiteItemResolver>,
    settings: Arc<dyn SettingsItemResolver>,
    repository: Arc<dyn ItemRepository>,
    languages: Arc<dyn LanguageRegistry>,
    associated_content_field: String,
    associated_media_field: String,
}

impl PredicateBuilder {
    pub fn new(
        homes: Arc<dyn HomeItemResolver>,
        sites: Arc<dyn SiteItemResolver>,
        settings: Arc<dyn SettingsItemResolver>,
        repository: Arc<dyn ItemRepository>,
        languages: Arc<dyn LanguageRegistry>,
    ) -> Self {
        Self {
            homes,
            sites,
            settings,
            repository,
            languages,
            associated_content_field: DEFAULT_ASSOCIATED_CONTENT_FIELD.to_string(),
            associated_media_field: DEFAULT_ASSOCIATED_MEDIA_FIELD.to_string(),
        }
    }

    /// Override the settings item fields holding associated targets
    pub fn with_association_fields(
        mut self,
        content_field: impl Into<String>,
        media_field: impl Into<String>,
    ) -> Self {
        self.associated_content_field = content_field.into();
        self.associated_media_field = media_field.into();
        self
    }

    /// Pages under the home item plus associated content and media.
    ///
    /// `False` when the site has no home item.
    pub fn page_or_media(&self, site: Option<&str>) -> Predicate {
        let Some(home) = self.homes.home_item(site) else {
            tracing::debug!("No home item for site {:?}, matching nothing", site);
            return Predicate::False;
        };

        let mut predicate = under(&home.id).and(Predicate::flag(Field::IsSearchable));

        if let Some(settings) = self.settings.settings_item(&home) {
            for target in settings.target_ids(&self.associated_content_field) {
                predicate = predicate.or(under(&target).and(Predicate::flag(Field::IsSearchable)));
            }

            // Media targets must still exist; content targets are used as stored
            let media = settings
                .target_ids(&self.associated_media_field)
                .into_iter()
                .filter_map(|id| self.repository.get_item(&id));
            for item in media {
                predicate = predicate.or(under(&item.id));
            }
        }

        predicate
    }

    /// Points of interest under the site item plus associated content.
    ///
    /// `False` when the site has no home item or the home has no site item.
    pub fn geolocation(&self, site: Option<&str>) -> Predicate {
        let Some(home) = self.homes.home_item(site) else {
            tracing::debug!("No home item for site {:?}, matching nothing", site);
            return Predicate::False;
        };
        let Some(site_item) = self.sites.site_item(&home) else {
            tracing::debug!("No site item above home {}, matching nothing", home.id);
            return Predicate::False;
        };

        let mut predicate =
            under(&site_item.id).and(Predicate::flag(Field::IsPointOfInterest));

        if let Some(settings) = self.settings.settings_item(&home) {
            for target in settings.target_ids(&self.associated_content_field) {
                predicate =
                    predicate.or(under(&target).and(Predicate::flag(Field::IsPointOfInterest)));
            }
        }

        predicate
    }

    /// Every whitespace-separated term must occur in the aggregated content
    pub fn content(&self, normalized_phrase: &str) -> Predicate {
        Predicate::all(
            normalized_phrase
                .split_whitespace()
                .map(|term| Predicate::contains(Field::AggregatedContent, term)),
        )
    }

    /// Any of the known languages in a `,` or `|` separated selector.
    ///
    /// `True` when the selector names no known language.
    pub fn language(&self, selector: Option<&str>) -> Predicate {
        let mut names: Vec<String> = Vec::new();
        for token in selector
            .unwrap_or_default()
            .split([',', '|'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            match self.languages.resolve(token) {
                Some(language) if !names.contains(&language.name) => names.push(language.name),
                Some(_) => {}
                None => tracing::debug!("Dropping unknown language '{}'", token),
            }
        }

        if names.is_empty() {
            return Predicate::True;
        }
        Predicate::any(names.into_iter().map(|n| Predicate::eq(Field::Language, n)))
    }

    pub fn latest_version(&self) -> Predicate {
        Predicate::flag(Field::LatestVersion)
    }

    /// Site base AND content AND language AND latest version
    pub fn compose(&self, request: &SearchRequest, normalized_phrase: &str) -> Predicate {
        let site = request.site.as_deref();
        let base = if request.geolocation {
            self.geolocation(site)
        } else {
            self.page_or_media(site)
        };

        base.and(self.content(normalized_phrase))
            .and(self.language(request.language.as_deref()))
            .and(self.latest_version())
    }
}

fn under(id: &ItemId) -> Predicate {
    Predicate::eq(Field::RawPath, id.to_search_id())
}
