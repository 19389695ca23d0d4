// Memory and tantivy backends must agree on membership and order

use crate::common::{create_test_services, id, result_ids, store_request, StoreFixture, SCOPE_PAGES};
use sitesearch::core::storage::{IndexBackend, SearchIndex, TantivyIndex};
use sitesearch::core::search::ContentQuery;
use sitesearch::core::types::{Coordinates, ItemId, SearchRequest};
use tempfile::TempDir;

fn requests() -> Vec<SearchRequest> {
    let mut scoped = store_request("coffee-shop");
    scoped.scope = Some(id(SCOPE_PAGES).to_string());
    scoped.language = Some("en".to_string());

    let mut french = store_request("coffee");
    french.language = Some("fr".to_string());

    let mut geo = store_request("");
    geo.geolocation = true;

    let mut sorted_page = store_request("");
    sorted_page.sort_order = Some("name,desc".to_string());
    sorted_page.page_size = 2;
    sorted_page.offset = 1;

    let mut by_distance = store_request("coffee");
    by_distance.geolocation = true;
    by_distance.sort_order = Some("distance".to_string());
    by_distance.coordinates = Some(Coordinates::new(55.0, 12.0));

    let mut nowhere = store_request("coffee");
    nowhere.site = Some("nowhere".to_string());

    vec![
        scoped,
        french,
        geo,
        sorted_page,
        by_distance,
        nowhere,
        store_request(""),
        store_request("coffee shop"),
        store_request("shop coffee"),
        store_request("COFFEE"),
        store_request("coff"),
        store_request("ee sh"),
        store_request("unicorn"),
        store_request("?!"),
    ]
}

fn sorted(mut ids: Vec<ItemId>) -> Vec<ItemId> {
    ids.sort();
    ids
}

#[test]
fn test_backends_agree_on_membership() {
    let fixture = StoreFixture::standard();
    let memory = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Memory);
    let tantivy = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Tantivy);

    for request in requests() {
        assert_eq!(
            sorted(result_ids(&memory, &request)),
            sorted(result_ids(&tantivy, &request)),
            "backends disagree for {:?}",
            request
        );
    }
}

#[test]
fn test_backends_agree_on_explicit_order() {
    let fixture = StoreFixture::standard();
    let memory = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Memory);
    let tantivy = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Tantivy);

    for key in ["name", "name,desc", "title,ascending"] {
        let mut request = store_request("");
        request.sort_order = Some(key.to_string());
        assert_eq!(
            result_ids(&memory, &request),
            result_ids(&tantivy, &request),
            "order differs for sort key {key}"
        );
    }
}

#[test]
fn test_tantivy_old_versions_excluded() {
    let fixture = StoreFixture::standard();
    let services = create_test_services(&fixture, StoreFixture::config(), IndexBackend::Tantivy);

    let ids = result_ids(&services, &store_request("archive"));
    assert!(ids.is_empty(), "old version returned: {ids:?}");
}

#[test]
fn test_tantivy_index_persists() {
    let temp = TempDir::new().unwrap();
    let fixture = StoreFixture::standard();

    {
        let index = TantivyIndex::create_in_dir("web_index", temp.path(), &fixture.documents).unwrap();
        assert_eq!(index.num_docs().unwrap(), fixture.documents.len() as u64);
    }

    let reopened = TantivyIndex::open_in_dir("web_index", temp.path()).unwrap();
    assert_eq!(reopened.name(), "web_index");

    let hits = reopened.execute(&ContentQuery::default()).unwrap();
    assert_eq!(hits.len(), fixture.documents.len());
}
