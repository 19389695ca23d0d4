// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in unit tests but are used in integration tests
#[allow(unused_imports)]
pub use fixtures::{id, StoreFixture, HOME, OUTSIDE, SCOPE_PAGES, SETTINGS, SHARED, SITE, TEMPLATE_PAGE};
#[allow(unused_imports)]
pub use helpers::{create_test_services, result_ids, store_request, write_fixture};
