// Integration tests for the search pipeline

use crate::common::{
    create_test_services, id, result_ids, store_request, StoreFixture, HOME, SCOPE_PAGES, SITE,
};
use sitesearch::core::config::{FacetConfig, FacetKind};
use sitesearch::core::search::{Field, SiteContext};
use sitesearch::core::storage::IndexBackend;
use sitesearch::core::types::Coordinates;

fn services() -> sitesearch::Services {
    create_test_services(
        &StoreFixture::standard(),
        StoreFixture::config(),
        IndexBackend::Memory,
    )
}

#[test]
fn test_coffee_shop_end_to_end() {
    let services = services();

    let mut request = store_request("coffee-shop");
    request.scope = Some(id(SCOPE_PAGES).to_string());
    request.language = Some("en".to_string());

    assert_eq!(result_ids(&services, &request), vec![id(0x10)]);
}

#[test]
fn test_old_version_never_returned() {
    let fixture = StoreFixture::empty().old_version(
        0x12,
        "Coffee Shop",
        &[SITE, HOME],
        "best coffee shop",
    );
    let services = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Memory);

    assert!(result_ids(&services, &store_request("coffee-shop")).is_empty());
    assert!(result_ids(&services, &store_request("")).is_empty());
}

#[test]
fn test_empty_phrase_matches_whole_site() {
    let services = services();
    let mut ids = result_ids(&services, &store_request(""));
    ids.sort();

    // Home pages and shared content; not hidden, old, POI or foreign
    assert_eq!(ids, vec![id(0x10), id(0x11), id(0x13)]);
}

#[test]
fn test_content_terms_are_conjunctive_and_unordered() {
    let services = services();

    let forward = result_ids(&services, &store_request("coffee shop"));
    let backward = result_ids(&services, &store_request("shop coffee"));
    assert_eq!(forward, vec![id(0x10)]);
    assert_eq!(forward, backward);

    assert!(result_ids(&services, &store_request("coffee unicorn")).is_empty());
}

#[test]
fn test_language_selector() {
    let services = services();

    let mut request = store_request("coffee");
    request.language = Some("en,fr".to_string());
    let mut ids = result_ids(&services, &request);
    ids.sort();
    assert_eq!(ids, vec![id(0x10), id(0x11), id(0x13)]);

    request.language = Some("fr".to_string());
    assert_eq!(result_ids(&services, &request), vec![id(0x11)]);

    // Unknown languages are dropped, leaving no restriction
    request.language = Some("xx".to_string());
    assert_eq!(result_ids(&services, &request).len(), 3);

    request.language = Some(String::new());
    assert_eq!(result_ids(&services, &request).len(), 3);
}

#[test]
fn test_unknown_site_matches_nothing() {
    let services = services();

    let mut request = store_request("coffee");
    request.site = Some("store2".to_string());
    assert!(result_ids(&services, &request).is_empty());

    request.site = None;
    assert!(result_ids(&services, &request).is_empty());
}

#[test]
fn test_geolocation_returns_points_of_interest() {
    let services = services();

    let mut request = store_request("coffee");
    request.geolocation = true;
    assert_eq!(result_ids(&services, &request), vec![id(0x15)]);
}

#[test]
fn test_geolocation_without_site_is_empty() {
    let services = services();

    let mut request = store_request("");
    request.geolocation = true;
    request.site = Some("nowhere".to_string());
    assert!(result_ids(&services, &request).is_empty());
}

#[test]
fn test_relevance_prefers_name_matches() {
    let services = services();
    let ids = result_ids(&services, &store_request("coffee"));

    assert_eq!(ids.first(), Some(&id(0x10)));
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_sort_by_name() {
    let services = services();

    let mut request = store_request("");
    request.sort_order = Some("name".to_string());
    assert_eq!(
        result_ids(&services, &request),
        vec![id(0x13), id(0x10), id(0x11)]
    );

    request.sort_order = Some("name,desc".to_string());
    assert_eq!(
        result_ids(&services, &request),
        vec![id(0x11), id(0x10), id(0x13)]
    );
}

#[test]
fn test_paging() {
    let services = services();

    let mut request = store_request("");
    request.sort_order = Some("name".to_string());

    request.page_size = 0;
    assert!(result_ids(&services, &request).is_empty());

    request.page_size = 2;
    request.offset = 1;
    assert_eq!(result_ids(&services, &request), vec![id(0x10), id(0x11)]);

    request.offset = 3;
    assert!(result_ids(&services, &request).is_empty());
}

#[test]
fn test_large_page_is_not_truncated() {
    let fixture = (0..112u8).fold(StoreFixture::empty(), |fixture, n| {
        fixture.page(0x20 + n, &format!("Page {n}"), &[SITE, HOME], "coffee", "en")
    });

    let mut request = store_request("coffee");
    request.page_size = 112;

    for backend in [IndexBackend::Memory, IndexBackend::Tantivy] {
        let services = create_test_services(&fixture, StoreFixture::config(), backend);
        assert_eq!(result_ids(&services, &request).len(), 112, "{backend:?}");
    }

    let mut config = StoreFixture::config();
    config.search.max_page_size = Some(100);
    let services = create_test_services(&fixture, config, IndexBackend::Memory);
    assert_eq!(result_ids(&services, &request).len(), 100);
}

#[test]
fn test_stale_index_entries_dropped() {
    let fixture = StoreFixture::standard().without_item(0x10);
    let services = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Memory);

    let results = services.search.search(&store_request("coffee shop")).unwrap();
    assert_eq!(results.remaining_hits().len(), 1);
    assert_eq!(results.count(), 0);
}

#[test]
fn test_value_facet() {
    let mut config = StoreFixture::config();
    config.facets.insert(
        "lang".to_string(),
        FacetConfig {
            kind: FacetKind::Value,
            field: Some(Field::Language),
        },
    );
    let services = create_test_services(&StoreFixture::standard(), config, IndexBackend::Memory);

    let mut request = store_request("coffee");
    request.params.insert("lang".to_string(), "fr".to_string());
    assert_eq!(result_ids(&services, &request), vec![id(0x11)]);

    // Parameters without a facet definition are ignored
    request.params.clear();
    request.params.insert("color".to_string(), "red".to_string());
    assert_eq!(result_ids(&services, &request).len(), 3);
}

#[test]
fn test_distance_facet() {
    let mut config = StoreFixture::config();
    config.facets.insert(
        "radius".to_string(),
        FacetConfig {
            kind: FacetKind::Distance,
            field: None,
        },
    );
    let services = create_test_services(&StoreFixture::standard(), config, IndexBackend::Memory);

    let mut request = store_request("");
    request.geolocation = true;
    request.params.insert("radius".to_string(), "5".to_string());

    request.coordinates = Some(Coordinates::new(55.6761, 12.5683));
    assert_eq!(result_ids(&services, &request), vec![id(0x15)]);

    // Aarhus is ~150 km away
    request.coordinates = Some(Coordinates::new(56.1629, 10.2039));
    assert!(result_ids(&services, &request).is_empty());
}

#[test]
fn test_context_item_placeholder_scope() {
    let mut fixture = StoreFixture::standard();
    let mut scope = sitesearch::Item::new(id(0x06), "Under current page");
    scope
        .fields
        .insert("ScopeQuery".to_string(), "+location:$CurrentItem".to_string());
    fixture.items.push(scope);
    let services = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Memory);

    let mut request = store_request("coffee");
    request.scope = Some(id(0x06).to_string());
    request.context_item_id = Some(id(0x13).to_string());
    assert_eq!(result_ids(&services, &request), vec![id(0x13)]);

    // Without a context item the placeholder clause is dropped
    request.context_item_id = None;
    assert_eq!(result_ids(&services, &request).len(), 3);
}

#[test]
fn test_site_context_restored_after_search() {
    let services = services();
    let before = services.site_context.current();

    let mut request = store_request("coffee");
    request.scope = Some(id(SCOPE_PAGES).to_string());
    services.search.search(&request).unwrap();

    assert_eq!(services.site_context.current(), before);
}

#[test]
fn test_per_site_index() {
    let mut config = StoreFixture::config();
    if let Some(site) = config.sites.get_mut("store1") {
        site.index = Some("store1_index".to_string());
    }
    let services = create_test_services(&StoreFixture::standard(), config, IndexBackend::Memory);

    // Per-site index is built from the fixture too
    assert_eq!(result_ids(&services, &store_request("coffee shop")), vec![id(0x10)]);

    let (_, index) = services.search.query(&store_request("coffee")).unwrap();
    assert_eq!(index, "store1_index");
}
