use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_into_words};
use crate::{DocId, DocumentStatus, ExecutionMode};

static NO_WORDS: BTreeMap<String, f64> = BTreeMap::new();

#[derive(Debug, Clone)]
struct DocumentData {
    rating: i32,
    status: DocumentStatus,
    /// term -> normalized term frequency; the inverse view of `postings`
    words: BTreeMap<String, f64>,
}

/// In-memory inverted index with a term -> postings view and a document -> terms view.
///
/// Both views are only ever changed together inside `add` and `remove`, which
/// take `&mut self`, so a reader can never observe one direction updated
/// without the other.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    stop_words: StopWords,
    postings: HashMap<String, BTreeMap<DocId, f64>>, // postings keyed by doc id
    documents: HashMap<DocId, DocumentData>,
    document_ids: Vec<DocId>,
}

impl InvertedIndex {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words, ..Self::default() }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Index a document. Nothing is committed unless every check passes.
    pub fn add(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if id < 0 {
            return Err(SearchError::NegativeDocumentId(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateDocumentId(id));
        }
        let words = self.split_into_words_no_stop(text)?;
        let words = term_frequencies(&words);

        for (word, tf) in &words {
            self.postings.entry(word.clone()).or_default().insert(id, *tf);
        }
        self.documents.insert(id, DocumentData { rating: average_rating(ratings), status, words });
        self.document_ids.push(id);
        Ok(())
    }

    /// Remove a document from every structure. Unknown ids are ignored.
    pub fn remove(&mut self, id: DocId, mode: ExecutionMode) {
        let Some(data) = self.documents.remove(&id) else {
            return;
        };
        self.document_ids.retain(|&doc_id| doc_id != id);

        match mode {
            ExecutionMode::Sequential => {
                for word in data.words.keys() {
                    let now_empty = match self.postings.get_mut(word) {
                        Some(docs) => {
                            docs.remove(&id);
                            docs.is_empty()
                        }
                        None => false,
                    };
                    if now_empty {
                        self.postings.remove(word);
                    }
                }
            }
            ExecutionMode::Parallel => {
                // Detach the document's posting lists so each worker owns exactly one.
                let mut lists: Vec<(String, BTreeMap<DocId, f64>)> = data
                    .words
                    .keys()
                    .filter_map(|word| self.postings.remove_entry(word.as_str()))
                    .collect();
                lists.par_iter_mut().for_each(|(_, docs)| {
                    docs.remove(&id);
                });
                self.postings.extend(lists.into_iter().filter(|(_, docs)| !docs.is_empty()));
            }
        }
    }

    /// Term frequencies of one document; empty for unknown ids.
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.documents.get(&id).map(|d| &d.words).unwrap_or(&NO_WORDS)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Id of the document added `index`-th among the live ones.
    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.document_ids
            .get(index)
            .copied()
            .ok_or(SearchError::OutOfRange { index, count: self.document_ids.len() })
    }

    /// Live ids in insertion order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DocId>> {
        self.document_ids.iter().copied()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn status(&self, id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&id).map(|d| d.status)
    }

    pub fn rating(&self, id: DocId) -> Option<i32> {
        self.documents.get(&id).map(|d| d.rating)
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Postings of a term: doc id -> term frequency.
    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.postings.get(term)
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map(|docs| docs.len()).unwrap_or(0)
    }

    pub(crate) fn document(&self, id: DocId) -> Option<(&BTreeMap<String, f64>, DocumentStatus)> {
        self.documents.get(&id).map(|d| (&d.words, d.status))
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}

impl<'a> IntoIterator for &'a InvertedIndex {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mean of the ratings truncated toward zero, 0 when there are none.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

fn term_frequencies(words: &[&str]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for word in words {
        *counts.entry(*word).or_insert(0) += 1;
    }
    let total = words.len() as f64;
    counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), f64::from(count) / total))
        .collect()
}
