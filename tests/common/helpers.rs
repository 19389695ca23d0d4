// Test helper functions

use crate::common::fixtures::StoreFixture;
use sitesearch::core::config::Config;
use sitesearch::core::services::Services;
use sitesearch::core::storage::IndexBackend;
use sitesearch::core::types::{ItemId, SearchRequest};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create services over a fixture with the given backend
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(
    fixture: &StoreFixture,
    config: Config,
    backend: IndexBackend,
) -> Services {
    Services::from_fixture(config, &fixture.content(), backend).expect("Failed to build services")
}

/// Request for `phrase` on `store1`
#[allow(dead_code)] // Used in integration tests
pub fn store_request(phrase: &str) -> SearchRequest {
    SearchRequest {
        site: Some("store1".to_string()),
        ..SearchRequest::for_phrase(phrase)
    }
}

/// Run a search and collect the materialized item ids
#[allow(dead_code)] // Used in integration tests
pub fn result_ids(services: &Services, request: &SearchRequest) -> Vec<ItemId> {
    services
        .search
        .search(request)
        .expect("Search failed")
        .map(|item| item.id)
        .collect()
}

/// Write a fixture as JSON into a temp dir (keep the dir alive during the test)
#[allow(dead_code)] // Used in integration tests
pub fn write_fixture(fixture: &StoreFixture) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("content.json");
    let json = serde_json::to_string_pretty(&fixture.content()).expect("Failed to serialize");
    std::fs::write(&path, json).expect("Failed to write fixture");
    (dir, path)
}
