//! Multisite structure: home, site and settings items.
//!
//! A site is laid out as `Site/Home` with a settings item next to the
//! home item (`Site/Settings`). The resolvers are separate traits so a
//! host platform can supply any of them on its own.

use crate::core::config::Config;
use crate::core::content::ItemRepository;
use crate::core::types::{Item, ItemId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolves the home item of a site
pub trait HomeItemResolver: Send + Sync {
    /// `site = None` means the default site
    fn home_item(&self, site: Option<&str>) -> Option<Item>;
}

/// Resolves the site item owning a home item
pub trait SiteItemResolver: Send + Sync {
    fn site_item(&self, home: &Item) -> Option<Item>;
}

/// Resolves the settings item associated with a home item
pub trait SettingsItemResolver: Send + Sync {
    fn settings_item(&self, home: &Item) -> Option<Item>;
}

/// Multisite resolvers over an item tree and configured site homes
pub struct SiteTree {
    repository: Arc<dyn ItemRepository>,
    homes: BTreeMap<String, ItemId>,
    default_site: Option<String>,
    settings_item_name: String,
}

impl SiteTree {
    pub fn new(
        repository: Arc<dyn ItemRepository>,
        homes: BTreeMap<String, ItemId>,
        default_site: Option<String>,
        settings_item_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            homes,
            default_site,
            settings_item_name: settings_item_name.into(),
        }
    }

    /// Build from the `[sites]` and `[multisite]` configuration sections.
    ///
    /// Sites with an unparseable home id are left out.
    pub fn from_config(repository: Arc<dyn ItemRepository>, config: &Config) -> Self {
        let homes = config
            .sites
            .iter()
            .filter_map(|(name, site)| ItemId::parse(&site.home).map(|id| (name.clone(), id)))
            .collect();

        Self::new(
            repository,
            homes,
            config.multisite.default_site.clone(),
            config.multisite.settings_item_name.clone(),
        )
    }

    fn site_name<'a>(&'a self, site: Option<&'a str>) -> Option<&'a str> {
        site.filter(|s| !s.trim().is_empty())
            .or(self.default_site.as_deref())
    }
}

impl HomeItemResolver for SiteTree {
    fn home_item(&self, site: Option<&str>) -> Option<Item> {
        let name = self.site_name(site)?;
        let home = self.homes.get(name)?;
        self.repository.get_item(home)
    }
}

impl SiteItemResolver for SiteTree {
    fn site_item(&self, home: &Item) -> Option<Item> {
        let parent = home.parent.as_ref()?;
        self.repository.get_item(parent)
    }
}

impl SettingsItemResolver for SiteTree {
    fn settings_item(&self, home: &Item) -> Option<Item> {
        let site = self.site_item(home)?;
        self.repository
            .children(&site.id)
            .into_iter()
            .find(|child| child.name.eq_ignore_ascii_case(&self.settings_item_name))
    }
}
