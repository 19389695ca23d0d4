//! Tantivy-backed search index.
//!
//! Predicates compile to tantivy queries which select candidates scored
//! with BM25. Each document is stored whole as JSON in the `source`
//! field; candidates are rebuilt from it and re-checked against the
//! predicate, so parts of a predicate tantivy cannot express exactly
//! (substring contains, distance) only widen the candidate set. Queries
//! that compile exactly skip the re-check.
//!
//! Contains on `aggregated_content` selects every document and scores the
//! term's tokens, so partial words still reach the re-check.

use super::SearchIndex;
use crate::core::error::{Result, SiteSearchError};
use crate::core::search::{ContentQuery, Field as DocField, Op, Predicate, Value as Operand};
use crate::core::types::{SearchDocument, SearchHit};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, BooleanQuery, EmptyQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, Value, INDEXED, STORED, STRING, TEXT,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexWriter, TantivyDocument, Term};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for search documents
///
/// Fields:
/// - item_id, raw_path, template, name, language: exact terms (STRING),
///   lowercased
/// - aggregated_content: full-text (TEXT)
/// - is_searchable, is_point_of_interest, latest_version: flags (bool)
/// - source: the whole document as JSON (STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("item_id", STRING);
    builder.add_text_field("raw_path", STRING);
    builder.add_text_field("template", STRING);
    builder.add_text_field("name", STRING);
    builder.add_text_field("language", STRING);

    builder.add_text_field("aggregated_content", TEXT);

    builder.add_bool_field("is_searchable", INDEXED);
    builder.add_bool_field("is_point_of_interest", INDEXED);
    builder.add_bool_field("latest_version", INDEXED);

    builder.add_text_field("source", STORED);

    builder.build()
}

/// Schema fields resolved once per index
#[derive(Debug, Clone, Copy)]
struct Fields {
    item_id: Field,
    raw_path: Field,
    template: Field,
    name: Field,
    language: Field,
    aggregated_content: Field,
    is_searchable: Field,
    is_point_of_interest: Field,
    latest_version: Field,
    source: Field,
}

impl Fields {
    fn resolve(schema: &Schema) -> Result<Self> {
        let get = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| SiteSearchError::StorageError(format!("Missing {name} field: {e}")))
        };

        Ok(Self {
            item_id: get("item_id")?,
            raw_path: get("raw_path")?,
            template: get("template")?,
            name: get("name")?,
            language: get("language")?,
            aggregated_content: get("aggregated_content")?,
            is_searchable: get("is_searchable")?,
            is_point_of_interest: get("is_point_of_interest")?,
            latest_version: get("latest_version")?,
            source: get("source")?,
        })
    }

    fn field(&self, field: DocField) -> Field {
        match field {
            DocField::ItemId => self.item_id,
            DocField::RawPath => self.raw_path,
            DocField::Template => self.template,
            DocField::Name => self.name,
            DocField::Language => self.language,
            DocField::AggregatedContent => self.aggregated_content,
            DocField::IsSearchable => self.is_searchable,
            DocField::IsPointOfInterest => self.is_point_of_interest,
            DocField::LatestVersion => self.latest_version,
        }
    }
}

/// A compiled predicate and whether it selects exactly the predicate's
/// matches (as opposed to a superset)
struct Compiled {
    query: Box<dyn Query>,
    exact: bool,
}

impl Compiled {
    fn exact(query: Box<dyn Query>) -> Self {
        Self { query, exact: true }
    }

    fn widened(query: Box<dyn Query>) -> Self {
        Self {
            query,
            exact: false,
        }
    }
}

/// Tantivy index wrapper
pub struct TantivyIndex {
    name: String,
    index: Index,
    fields: Fields,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("name", &self.name)
            .field("schema", &"<schema>")
            .finish()
    }
}

impl TantivyIndex {
    /// Build an index held in RAM from documents
    pub fn in_ram(name: impl Into<String>, documents: &[SearchDocument]) -> Result<Self> {
        let index = Index::create_in_ram(create_schema());
        let this = Self::wrap(name.into(), index)?;
        this.write(documents)?;
        Ok(this)
    }

    /// Create an index at the given path from documents
    pub fn create_in_dir(
        name: impl Into<String>,
        index_dir: &Path,
        documents: &[SearchDocument],
    ) -> Result<Self> {
        std::fs::create_dir_all(index_dir)?;

        let index = Index::create_in_dir(index_dir, create_schema())
            .map_err(|e| SiteSearchError::StorageError(format!("Failed to create index: {e}")))?;

        let this = Self::wrap(name.into(), index)?;
        this.write(documents)?;
        Ok(this)
    }

    /// Open an existing index
    pub fn open_in_dir(name: impl Into<String>, index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)
            .map_err(|e| SiteSearchError::StorageError(format!("Failed to open index: {e}")))?;

        Self::wrap(name.into(), index)
    }

    fn wrap(name: String, index: Index) -> Result<Self> {
        let fields = Fields::resolve(&index.schema())?;
        Ok(Self {
            name,
            index,
            fields,
        })
    }

    /// Add documents and commit (batch operation)
    pub fn write(&self, documents: &[SearchDocument]) -> Result<()> {
        let mut writer: IndexWriter = self
            .index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| SiteSearchError::StorageError(format!("Failed to create writer: {e}")))?;

        for document in documents {
            writer
                .add_document(self.to_tantivy(document)?)
                .map_err(|e| SiteSearchError::StorageError(format!("Failed to add document: {e}")))?;
        }

        writer
            .commit()
            .map_err(|e| SiteSearchError::StorageError(format!("Failed to commit: {e}")))?;
        Ok(())
    }

    fn to_tantivy(&self, document: &SearchDocument) -> Result<TantivyDocument> {
        let f = &self.fields;
        let mut doc = TantivyDocument::default();

        doc.add_text(f.item_id, document.item_id.as_search_id());
        for ancestor in &document.raw_path {
            doc.add_text(f.raw_path, ancestor.to_ascii_lowercase());
        }
        if let Some(template) = &document.template {
            doc.add_text(f.template, template.to_ascii_lowercase());
        }
        doc.add_text(f.name, document.name.to_ascii_lowercase());
        doc.add_text(f.language, document.language.to_ascii_lowercase());
        doc.add_text(f.aggregated_content, &document.aggregated_content);
        doc.add_bool(f.is_searchable, document.is_searchable);
        doc.add_bool(f.is_point_of_interest, document.is_point_of_interest);
        doc.add_bool(f.latest_version, document.latest_version);
        doc.add_text(f.source, serde_json::to_string(document)?);

        Ok(doc)
    }

    /// Number of searchable documents
    pub fn num_docs(&self) -> Result<u64> {
        let reader = self
            .index
            .reader()
            .map_err(|e| SiteSearchError::StorageError(format!("Failed to create reader: {e}")))?;
        Ok(reader.searcher().num_docs())
    }

    /// Compile a predicate into a tantivy query
    fn compile(&self, predicate: &Predicate) -> Result<Compiled> {
        Ok(match predicate {
            Predicate::True => Compiled::exact(Box::new(AllQuery)),
            Predicate::False => Compiled::exact(Box::new(EmptyQuery)),
            Predicate::Compare { field, op, value } => self.compile_compare(*field, *op, value)?,
            Predicate::And(l, r) => {
                let (l, r) = (self.compile(l)?, self.compile(r)?);
                Compiled {
                    exact: l.exact && r.exact,
                    query: Box::new(BooleanQuery::new(vec![
                        (Occur::Must, l.query),
                        (Occur::Must, r.query),
                    ])),
                }
            }
            Predicate::Or(l, r) => {
                let (l, r) = (self.compile(l)?, self.compile(r)?);
                Compiled {
                    exact: l.exact && r.exact,
                    query: Box::new(BooleanQuery::new(vec![
                        (Occur::Should, l.query),
                        (Occur::Should, r.query),
                    ])),
                }
            }
            Predicate::Not(inner) => {
                let inner = self.compile(inner)?;
                if inner.exact {
                    Compiled::exact(Box::new(BooleanQuery::new(vec![
                        (Occur::Must, Box::new(AllQuery) as Box<dyn Query>),
                        (Occur::MustNot, inner.query),
                    ])))
                } else {
                    // Negating a superset would drop real matches
                    Compiled::widened(Box::new(AllQuery))
                }
            }
            Predicate::Within { .. } => Compiled::widened(Box::new(AllQuery)),
        })
    }

    fn compile_compare(&self, field: DocField, op: Op, value: &Operand) -> Result<Compiled> {
        let target = self.fields.field(field);

        Ok(match (op, value) {
            (Op::Eq, Operand::Bool(flag)) if field.is_flag() => Compiled::exact(Box::new(
                TermQuery::new(Term::from_field_bool(target, *flag), IndexRecordOption::Basic),
            )),
            (Op::Eq, Operand::Text(text)) if !field.is_flag() => {
                if field == DocField::AggregatedContent {
                    Compiled::widened(self.all_tokens(target, text)?)
                } else {
                    Compiled::exact(Box::new(TermQuery::new(
                        Term::from_field_text(target, &text.to_ascii_lowercase()),
                        IndexRecordOption::Basic,
                    )))
                }
            }
            (Op::Contains, Operand::Text(text)) if !field.is_flag() => {
                if field == DocField::AggregatedContent {
                    Compiled::widened(self.scored_tokens(target, text)?)
                } else {
                    Compiled::widened(Box::new(AllQuery))
                }
            }
            // Operand type does not fit the field; never matches
            _ => Compiled::exact(Box::new(EmptyQuery)),
        })
    }

    /// Every token of `text` must occur in a full-text field
    fn all_tokens(&self, field: Field, text: &str) -> Result<Box<dyn Query>> {
        let clauses = self.token_clauses(field, text, Occur::Must)?;
        if clauses.is_empty() {
            return Ok(Box::new(AllQuery));
        }
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    /// All documents, with the tokens of `text` adding to the score
    fn scored_tokens(&self, field: Field, text: &str) -> Result<Box<dyn Query>> {
        let mut clauses = self.token_clauses(field, text, Occur::Should)?;
        clauses.insert(0, (Occur::Must, Box::new(AllQuery)));
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    fn token_clauses(
        &self,
        field: Field,
        text: &str,
        occur: Occur,
    ) -> Result<Vec<(Occur, Box<dyn Query>)>> {
        let mut analyzer = self
            .index
            .tokenizer_for_field(field)
            .map_err(|e| SiteSearchError::SearchFailed(format!("Missing tokenizer: {e}")))?;

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        let mut stream = analyzer.token_stream(text);
        while stream.advance() {
            let term = Term::from_field_text(field, &stream.token().text);
            clauses.push((
                occur,
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
            ));
        }
        Ok(clauses)
    }
}

impl SearchIndex for TantivyIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, query: &ContentQuery) -> Result<Vec<SearchHit>> {
        if query.is_empty_page() {
            return Ok(Vec::new());
        }

        let predicate = query.predicate();
        let compiled = self.compile(&predicate)?;
        tracing::debug!(
            "Tantivy query on '{}' (exact: {}): {}",
            self.name,
            compiled.exact,
            predicate
        );

        let reader = self
            .index
            .reader()
            .map_err(|e| SiteSearchError::SearchFailed(format!("Failed to create reader: {e}")))?;
        let searcher = reader.searcher();

        // Ordering and paging happen after the re-check, so collect everything
        let limit = searcher.num_docs().max(1) as usize;
        let top_docs = searcher
            .search(&*compiled.query, &TopDocs::with_limit(limit))
            .map_err(|e| SiteSearchError::SearchFailed(format!("Search failed: {e}")))?;

        let mut candidates = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                SiteSearchError::SearchFailed(format!("Failed to retrieve document: {e}"))
            })?;
            let source = doc
                .get_first(self.fields.source)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    SiteSearchError::StorageError("Document without source".to_string())
                })?;
            let document: SearchDocument = serde_json::from_str(source)?;
            candidates.push((document, score));
        }

        if compiled.exact {
            Ok(query.rank_matching(candidates))
        } else {
            Ok(query.rank(candidates))
        }
    }
}
