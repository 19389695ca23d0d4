//! Tests for the search CLI command

use crate::common::{id, write_fixture, StoreFixture, SCOPE_PAGES};
use sitesearch::cli::commands::search::{build_request, execute, SearchArgs};
use sitesearch::cli::OutputFormat;
use sitesearch::core::storage::IndexBackend;
use std::path::PathBuf;

fn args(phrase: &str, content: PathBuf) -> SearchArgs {
    SearchArgs {
        phrase: Some(phrase.to_string()),
        content,
        scope: None,
        language: None,
        sort: None,
        page_size: None,
        offset: 0,
        site: Some("store1".to_string()),
        item: None,
        lat: None,
        lon: None,
        params: Vec::new(),
        geolocation: false,
        explain: false,
        backend: IndexBackend::Memory,
    }
}

#[test]
fn test_search_human() {
    let (_dir, path) = write_fixture(&StoreFixture::standard());
    let result = execute(args("coffee", path), StoreFixture::config(), OutputFormat::Human);
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[test]
fn test_search_json_tantivy() {
    let (_dir, path) = write_fixture(&StoreFixture::standard());
    let mut args = args("coffee-shop", path);
    args.scope = Some(id(SCOPE_PAGES).to_string());
    args.backend = IndexBackend::Tantivy;

    let result = execute(args, StoreFixture::config(), OutputFormat::Json);
    assert!(result.is_ok(), "JSON search should succeed: {:?}", result.err());
}

#[test]
fn test_search_empty_results() {
    let (_dir, path) = write_fixture(&StoreFixture::standard());
    let result = execute(args("unicorn", path), StoreFixture::config(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_search_explain() {
    let (_dir, path) = write_fixture(&StoreFixture::standard());
    for format in [OutputFormat::Human, OutputFormat::Json] {
        let mut args = args("coffee", path.clone());
        args.explain = true;
        let result = execute(args, StoreFixture::config(), format);
        assert!(result.is_ok(), "Explain should succeed: {:?}", result.err());
    }
}

#[test]
fn test_search_missing_fixture() {
    let result = execute(
        args("coffee", PathBuf::from("/nonexistent/content.json")),
        StoreFixture::config(),
        OutputFormat::Human,
    );
    assert!(result.is_err());
}

#[test]
fn test_build_request_defaults_and_marker() {
    let (_dir, path) = write_fixture(&StoreFixture::empty());
    let mut config = StoreFixture::config();
    config.search.default_page_size = 7;

    let mut args = args("coffee", path);
    args.params = vec![("G".to_string(), "1".to_string())];
    args.lat = Some(55.0);
    args.lon = Some(12.0);

    let request = build_request(&args, &config);
    assert_eq!(request.page_size, 7);
    assert!(request.geolocation, "marker parameter enables geolocation");
    assert_eq!(request.params.get("G").map(String::as_str), Some("1"));
    assert!(request.coordinates.is_some());

    args.params.clear();
    args.page_size = Some(3);
    let request = build_request(&args, &config);
    assert_eq!(request.page_size, 3);
    assert!(!request.geolocation);
}
