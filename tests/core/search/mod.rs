pub mod test_backends;
pub mod test_search;
