//! Content items and content fixtures.
//!
//! The platform owns item storage; [`ItemRepository`] is the read-only
//! view the search layer needs. [`MemoryItemRepository`] and
//! [`ContentFixture`] back tests and the CLI with a JSON file holding
//! items and the search documents projected from them.

use crate::core::error::{Result, SiteSearchError};
use crate::core::types::{Item, ItemId, SearchDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read access to content items
pub trait ItemRepository: Send + Sync {
    /// `None` when the item does not exist
    fn get_item(&self, id: &ItemId) -> Option<Item>;

    /// Direct children of an item, in insertion order
    fn children(&self, id: &ItemId) -> Vec<Item>;
}

/// Item repository held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryItemRepository {
    items: HashMap<ItemId, Item>,
    order: Vec<ItemId>,
}

impl MemoryItemRepository {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let mut repo = Self::default();
        for item in items {
            repo.insert(item);
        }
        repo
    }

    /// Insert or replace an item
    pub fn insert(&mut self, item: Item) {
        if !self.items.contains_key(&item.id) {
            self.order.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    /// Remove an item, leaving any index entries for it stale
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        self.order.retain(|i| i != id);
        self.items.remove(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemRepository for MemoryItemRepository {
    fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.items.get(id).cloned()
    }

    fn children(&self, id: &ItemId) -> Vec<Item> {
        self.order
            .iter()
            .filter_map(|i| self.items.get(i))
            .filter(|item| item.parent.as_ref() == Some(id))
            .cloned()
            .collect()
    }
}

/// Items plus search documents, loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFixture {
    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub documents: Vec<SearchDocument>,
}

impl ContentFixture {
    /// Load a fixture from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            SiteSearchError::InvalidContent(format!(
                "Failed to read content file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: ContentFixture = serde_json::from_str(json)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Reject fixtures with duplicate item ids
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(&item.id) {
                return Err(SiteSearchError::InvalidContent(format!(
                    "Duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(())
    }

    pub fn repository(&self) -> MemoryItemRepository {
        MemoryItemRepository::new(self.items.iter().cloned())
    }
}
