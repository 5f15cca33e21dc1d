//! TF-IDF relevance and top-K ordering.

use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::index::InvertedIndex;
use crate::query::Query;
use crate::{DocId, Document, DocumentStatus, ExecutionMode, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};

/// Decides which documents may appear in ranked results.
pub trait DocumentFilter: Sync {
    fn accepts(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool;
}

impl DocumentFilter for DocumentStatus {
    fn accepts(&self, _id: DocId, status: DocumentStatus, _rating: i32) -> bool {
        status == *self
    }
}

impl<F> DocumentFilter for F
where
    F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    fn accepts(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool {
        self(id, status, rating)
    }
}

/// Rank documents for `query`, keeping at most `MAX_RESULT_DOCUMENT_COUNT`.
pub fn find_top_documents<F: DocumentFilter + ?Sized>(
    index: &InvertedIndex,
    query: &Query<'_>,
    filter: &F,
    mode: ExecutionMode,
) -> Vec<Document> {
    let mut matched = find_all_documents(index, query, filter, mode);
    match mode {
        ExecutionMode::Sequential => matched.sort_by(by_relevance),
        ExecutionMode::Parallel => matched.par_sort_by(by_relevance),
    }
    order_ties_by_rating(&mut matched);
    matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
    matched
}

/// `ln(N / df)` for a term present in `df` of the index's documents.
pub fn inverse_document_freq(index: &InvertedIndex, df: usize) -> f64 {
    (index.document_count() as f64 / df as f64).ln()
}

fn find_all_documents<F: DocumentFilter + ?Sized>(
    index: &InvertedIndex,
    query: &Query<'_>,
    filter: &F,
    mode: ExecutionMode,
) -> Vec<Document> {
    let accumulate = |mut relevance: BTreeMap<DocId, f64>, word: &&str| {
        if let Some(postings) = index.postings(word) {
            let idf = inverse_document_freq(index, postings.len());
            for (&id, &tf) in postings {
                let accepted = match (index.status(id), index.rating(id)) {
                    (Some(status), Some(rating)) => filter.accepts(id, status, rating),
                    _ => false,
                };
                if accepted {
                    *relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
        relevance
    };

    let mut relevance = match mode {
        ExecutionMode::Sequential => query.plus_words.iter().fold(BTreeMap::new(), accumulate),
        ExecutionMode::Parallel => query
            .plus_words
            .par_iter()
            .fold(BTreeMap::new, accumulate)
            .reduce(BTreeMap::new, |mut acc, part| {
                for (id, r) in part {
                    *acc.entry(id).or_insert(0.0) += r;
                }
                acc
            }),
    };

    for word in &query.minus_words {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                relevance.remove(id);
            }
        }
    }

    relevance
        .into_iter()
        .map(|(id, relevance)| Document { id, relevance, rating: index.rating(id).unwrap_or(0) })
        .collect()
}

fn by_relevance(lhs: &Document, rhs: &Document) -> Ordering {
    rhs.relevance.total_cmp(&lhs.relevance)
}

// Input is sorted by descending relevance. Each run of documents whose relevance
// is within RELEVANCE_EPSILON of the run's leader is reordered by rating.
fn order_ties_by_rating(docs: &mut [Document]) {
    let mut start = 0;
    while start < docs.len() {
        let leader = docs[start].relevance;
        let end = docs[start..]
            .iter()
            .position(|d| (leader - d.relevance).abs() >= RELEVANCE_EPSILON)
            .map_or(docs.len(), |offset| start + offset);
        docs[start..end].sort_by(|lhs, rhs| rhs.rating.cmp(&lhs.rating));
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocId, relevance: f64, rating: i32) -> Document {
        Document { id, relevance, rating }
    }

    #[test]
    fn near_equal_relevance_orders_by_rating() {
        let mut docs = vec![doc(0, 0.5, 1), doc(1, 0.5 + 1e-8, 9), doc(2, 0.9, -4), doc(3, 0.1, 7)];
        docs.sort_by(by_relevance);
        order_ties_by_rating(&mut docs);
        let ids: Vec<DocId> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 1, 0, 3]);
    }

    #[test]
    fn status_and_closure_filters() {
        assert!(DocumentStatus::Banned.accepts(1, DocumentStatus::Banned, 0));
        assert!(!DocumentStatus::Banned.accepts(1, DocumentStatus::Actual, 0));
        let even = |id: DocId, _: DocumentStatus, _: i32| id % 2 == 0;
        assert!(even.accepts(4, DocumentStatus::Removed, 0));
        assert!(!even.accepts(3, DocumentStatus::Actual, 0));
    }
}
