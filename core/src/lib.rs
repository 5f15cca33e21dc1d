use serde::{Deserialize, Serialize};
use std::fmt;

pub mod corpus;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod query;
pub mod ranker;
pub mod request_queue;
pub mod stop_words;
pub mod tokenizer;

pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use index::InvertedIndex;
pub use query::Query;
pub use ranker::DocumentFilter;
pub use request_queue::RequestQueue;
pub use stop_words::StopWords;

pub type DocId = i32;

/// Maximum number of documents returned by a ranked search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Actual => "ACTUAL",
            DocumentStatus::Irrelevant => "IRRELEVANT",
            DocumentStatus::Banned => "BANNED",
            DocumentStatus::Removed => "REMOVED",
        };
        f.write_str(s)
    }
}

/// Parses the same upper-case names that serde and `Display` use.
impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTUAL" => Ok(DocumentStatus::Actual),
            "IRRELEVANT" => Ok(DocumentStatus::Irrelevant),
            "BANNED" => Ok(DocumentStatus::Banned),
            "REMOVED" => Ok(DocumentStatus::Removed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// How an operation distributes its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Single-threaded with deterministic enumeration order.
    #[default]
    Sequential,
    /// Fan out over disjoint terms on the rayon pool, joined before returning.
    Parallel,
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_agree_across_parsers() {
        for status in [DocumentStatus::Actual, DocumentStatus::Irrelevant, DocumentStatus::Banned, DocumentStatus::Removed] {
            let name = status.to_string();
            assert_eq!(name.parse::<DocumentStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{name}\""));
            assert_eq!(serde_json::from_str::<DocumentStatus>(&json).unwrap(), status);
        }
        assert!("banned".parse::<DocumentStatus>().is_err());
        assert!(serde_json::from_str::<DocumentStatus>("\"banned\"").is_err());
    }
}
