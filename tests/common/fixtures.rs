// Test fixtures for integration testing
//
// A single-site content tree:
//
//   Store1 (SITE)
//   +-- Home (HOME)             pages live here
//   +-- Settings (SETTINGS)     AssociatedContent -> SHARED
//   +-- POIs are stored directly under the site item
//   Shared (SHARED)             shared content outside the site
//   Scope items (SCOPE_PAGES)   "+template:TEMPLATE_PAGE"
//   Elsewhere (OUTSIDE)         another tenant's content

use sitesearch::core::config::{Config, SiteConfig};
use sitesearch::core::content::ContentFixture;
use sitesearch::core::types::{Coordinates, Item, ItemId, SearchDocument};

#[allow(dead_code)]
pub const SITE: u8 = 0x01;
#[allow(dead_code)]
pub const HOME: u8 = 0x02;
#[allow(dead_code)]
pub const SETTINGS: u8 = 0x03;
#[allow(dead_code)]
pub const SHARED: u8 = 0x04;
#[allow(dead_code)]
pub const SCOPE_PAGES: u8 = 0x05;
#[allow(dead_code)]
pub const TEMPLATE_PAGE: u8 = 0x0a;
#[allow(dead_code)]
pub const OUTSIDE: u8 = 0x09;

/// Deterministic item id built from one repeated byte
pub fn id(n: u8) -> ItemId {
    ItemId::parse(&format!("{n:02x}").repeat(16)).expect("valid id")
}

fn path(ids: &[u8]) -> Vec<String> {
    ids.iter().map(|n| id(*n).to_search_id()).collect()
}

/// Builder for the store content tree and its search documents
#[allow(dead_code)]
pub struct StoreFixture {
    pub items: Vec<Item>,
    pub documents: Vec<SearchDocument>,
}

#[allow(dead_code)]
impl StoreFixture {
    /// Site structure without any pages
    pub fn empty() -> Self {
        let mut home = Item::new(id(HOME), "Home");
        home.parent = Some(id(SITE));

        let mut settings = Item::new(id(SETTINGS), "Settings");
        settings.parent = Some(id(SITE));
        settings
            .fields
            .insert("AssociatedContent".to_string(), id(SHARED).to_string());

        let mut scope = Item::new(id(SCOPE_PAGES), "Pages only");
        scope.fields.insert(
            "ScopeQuery".to_string(),
            format!("+template:{}", id(TEMPLATE_PAGE)),
        );

        Self {
            items: vec![
                Item::new(id(SITE), "Store1"),
                home,
                settings,
                Item::new(id(SHARED), "Shared"),
                scope,
                Item::new(id(OUTSIDE), "Elsewhere"),
            ],
            documents: Vec::new(),
        }
    }

    /// The standard store: pages, an old version, shared content,
    /// a hidden page, a point of interest and another tenant's page
    pub fn standard() -> Self {
        Self::empty()
            .page(0x10, "Coffee Shop", &[SITE, HOME], "best coffee shop", "en")
            .page(0x11, "Tea Room", &[SITE, HOME], "tea and coffee", "fr")
            .old_version(0x12, "Coffee Archive", &[SITE, HOME], "coffee shop archive")
            .page(0x13, "Beans", &[SHARED], "coffee beans shared", "en")
            .hidden(0x14, "Hidden", &[SITE, HOME], "coffee hidden")
            .poi(0x15, "Downtown Store", "coffee store downtown", Coordinates::new(55.68, 12.57))
            .page(0x16, "Foreign", &[OUTSIDE], "coffee elsewhere", "en")
    }

    /// Searchable latest-version page with the page template
    pub fn page(mut self, n: u8, name: &str, ancestors: &[u8], content: &str, language: &str) -> Self {
        let mut item = Item::new(id(n), name);
        item.parent = ancestors.last().map(|p| id(*p));
        item.template = Some(id(TEMPLATE_PAGE));
        self.items.push(item);

        let mut raw_path = ancestors.to_vec();
        raw_path.push(n);
        self.documents.push(SearchDocument {
            item_id: id(n),
            raw_path: path(&raw_path),
            template: Some(id(TEMPLATE_PAGE).to_search_id()),
            name: name.to_string(),
            is_searchable: true,
            is_point_of_interest: false,
            language: language.to_string(),
            aggregated_content: content.to_string(),
            latest_version: true,
            updated: None,
            location: None,
        });
        self
    }

    /// Page whose only indexed version is not the latest
    pub fn old_version(self, n: u8, name: &str, ancestors: &[u8], content: &str) -> Self {
        let mut fixture = self.page(n, name, ancestors, content, "en");
        if let Some(doc) = fixture.documents.last_mut() {
            doc.latest_version = false;
        }
        fixture
    }

    /// Page excluded from search
    pub fn hidden(self, n: u8, name: &str, ancestors: &[u8], content: &str) -> Self {
        let mut fixture = self.page(n, name, ancestors, content, "en");
        if let Some(doc) = fixture.documents.last_mut() {
            doc.is_searchable = false;
        }
        fixture
    }

    /// Point of interest stored under the site item
    pub fn poi(mut self, n: u8, name: &str, content: &str, location: Coordinates) -> Self {
        let mut item = Item::new(id(n), name);
        item.parent = Some(id(SITE));
        self.items.push(item);

        self.documents.push(SearchDocument {
            item_id: id(n),
            raw_path: path(&[SITE, n]),
            template: None,
            name: name.to_string(),
            is_searchable: false,
            is_point_of_interest: true,
            language: "en".to_string(),
            aggregated_content: content.to_string(),
            latest_version: true,
            updated: None,
            location: Some(location),
        });
        self
    }

    /// Drop an item while keeping its search document
    pub fn without_item(mut self, n: u8) -> Self {
        self.items.retain(|item| item.id != id(n));
        self
    }

    pub fn content(&self) -> ContentFixture {
        ContentFixture {
            items: self.items.clone(),
            documents: self.documents.clone(),
        }
    }

    /// Config with `store1` mapped to the fixture's home item
    pub fn config() -> Config {
        let mut config = Config::default();
        config.languages.known = vec!["en".to_string(), "fr".to_string()];
        config.sites.insert(
            "store1".to_string(),
            SiteConfig {
                home: id(HOME).to_string(),
                index: None,
            },
        );
        config
    }
}
