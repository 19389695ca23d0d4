//! Index that evaluates predicates directly over documents.

use super::SearchIndex;
use crate::core::error::Result;
use crate::core::search::ContentQuery;
use crate::core::types::{SearchDocument, SearchHit};

/// Every document carries the same base score, so relevance order comes
/// from boosts alone
const BASE_SCORE: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    name: String,
    documents: Vec<SearchDocument>,
}

impl MemoryIndex {
    pub fn new(name: impl Into<String>, documents: Vec<SearchDocument>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    pub fn add(&mut self, document: SearchDocument) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SearchIndex for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, query: &ContentQuery) -> Result<Vec<SearchHit>> {
        if query.is_empty_page() {
            return Ok(Vec::new());
        }

        let candidates = self
            .documents
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .map(|doc| (doc, BASE_SCORE))
            .collect();

        Ok(query.rank(candidates))
    }
}
