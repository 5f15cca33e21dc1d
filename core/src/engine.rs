use std::collections::BTreeMap;

use crate::error::Result;
use crate::index::InvertedIndex;
use crate::matcher::match_document;
use crate::query::Query;
use crate::ranker::{find_top_documents, DocumentFilter};
use crate::stop_words::StopWords;
use crate::{DocId, Document, DocumentStatus, ExecutionMode};

/// Search front door: ingestion, ranked search, matching and removal over one index.
#[derive(Debug, Default)]
pub struct SearchEngine {
    index: InvertedIndex,
}

impl SearchEngine {
    pub fn new(stop_words: StopWords) -> Self {
        Self { index: InvertedIndex::new(stop_words) }
    }

    /// Engine whose stop words are the space-separated words of `text`.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::new(StopWords::from_text(text)?))
    }

    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        self.index.add(id, text, status, ratings)
    }

    /// Top documents with status `ACTUAL`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, DocumentStatus::Actual)
    }

    /// Top documents accepted by `filter`: a status or a `(id, status, rating)` predicate.
    pub fn find_top_documents_by<F: DocumentFilter>(&self, raw_query: &str, filter: F) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, filter)
    }

    pub fn find_top_documents_with<F: DocumentFilter>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>> {
        let query = Query::parse(raw_query, self.index.stop_words())?;
        Ok(find_top_documents(&self.index, &query, &filter, mode))
    }

    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocId,
        mode: ExecutionMode,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let query = Query::parse(raw_query, self.index.stop_words())?;
        match_document(&self.index, &query, id, mode)
    }

    pub fn remove_document(&mut self, id: DocId, mode: ExecutionMode) {
        self.index.remove(id, mode)
    }

    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.index.word_frequencies(id)
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.index.document_id_at(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.index.iter()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }
}

impl<'a> IntoIterator for &'a SearchEngine {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.index.iter()
    }
}
