use std::collections::VecDeque;

use crate::engine::SearchEngine;
use crate::error::Result;
use crate::ranker::DocumentFilter;
use crate::{Document, DocumentStatus, ExecutionMode};

/// Minutes in a day: one request per minute over the last day.
pub const DEFAULT_REQUEST_WINDOW: usize = 1440;

#[derive(Debug)]
struct QueryResult {
    query: String,
    result_count: usize,
}

/// Sliding window over the most recent searches, counting the ones that found nothing.
#[derive(Debug)]
pub struct RequestQueue {
    requests: VecDeque<QueryResult>,
    window: usize,
    no_result_count: usize,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_REQUEST_WINDOW)
    }

    /// Queue remembering the last `window` searches. A window of 0 is raised
    /// to 1 so the most recent search is always kept.
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self { requests: VecDeque::with_capacity(window), window, no_result_count: 0 }
    }

    /// Search `engine` and record the outcome. Failed queries are not recorded.
    pub fn add_find_request<F: DocumentFilter>(
        &mut self,
        engine: &SearchEngine,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>> {
        self.add_find_request_with(engine, ExecutionMode::Sequential, raw_query, filter)
    }

    pub fn add_find_request_with<F: DocumentFilter>(
        &mut self,
        engine: &SearchEngine,
        mode: ExecutionMode,
        raw_query: &str,
        filter: F,
    ) -> Result<Vec<Document>> {
        let result = engine.find_top_documents_with(mode, raw_query, filter)?;
        self.record(raw_query, result.len());
        Ok(result)
    }

    pub fn add_find_request_actual(&mut self, engine: &SearchEngine, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request(engine, raw_query, DocumentStatus::Actual)
    }

    /// Searches inside the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    /// Text of the most recent recorded search.
    pub fn last_query(&self) -> Option<&str> {
        self.requests.back().map(|r| r.query.as_str())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn record(&mut self, raw_query: &str, result_count: usize) {
        while self.requests.len() >= self.window {
            if let Some(evicted) = self.requests.pop_front() {
                if evicted.result_count == 0 {
                    self.no_result_count -= 1;
                }
            }
        }
        if result_count == 0 {
            self.no_result_count += 1;
        }
        self.requests.push_back(QueryResult { query: raw_query.to_string(), result_count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_and_tracks_empty_results() {
        let mut engine = SearchEngine::from_stop_words_text("and in at").unwrap();
        engine.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        engine.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();

        let mut queue = RequestQueue::with_window(3);
        for _ in 0..3 {
            assert!(queue.add_find_request_actual(&engine, "empty request").unwrap().is_empty());
        }
        assert_eq!(queue.no_result_requests(), 3);

        queue.add_find_request_actual(&engine, "curly dog").unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.no_result_requests(), 2);

        queue.add_find_request(&engine, "big collar", DocumentStatus::Actual).unwrap();
        queue.add_find_request(&engine, "sparrow", DocumentStatus::Actual).unwrap();
        assert_eq!(queue.no_result_requests(), 1);
        assert_eq!(queue.last_query(), Some("sparrow"));
    }

    #[test]
    fn failed_queries_are_not_recorded() {
        let engine = SearchEngine::default();
        let mut queue = RequestQueue::new();
        assert!(queue.add_find_request_actual(&engine, "cat --dog").is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_window_keeps_the_latest_search() {
        let engine = SearchEngine::default();
        let mut queue = RequestQueue::with_window(0);
        queue.add_find_request_actual(&engine, "cat").unwrap();
        queue.add_find_request_actual(&engine, "dog").unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.no_result_requests(), 1);
        assert_eq!(queue.last_query(), Some("dog"));
    }
}
