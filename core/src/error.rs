use thiserror::Error;

use crate::DocId;

/// Errors raised by the index and its collaborators.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("document id {0} is already indexed")]
    DuplicateDocumentId(DocId),

    #[error("document id {0} is negative")]
    NegativeDocumentId(DocId),

    #[error("invalid word: {0:?}")]
    InvalidWord(String),

    #[error("ordinal {index} is out of range for {count} documents")]
    OutOfRange { index: usize, count: usize },

    #[error("document {0} not found")]
    UnknownDocument(DocId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// True when the caller supplied bad input, as opposed to an environment failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SearchError::Io(_) | SearchError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(SearchError::UnknownDocument(7).to_string(), "document 7 not found");
        assert_eq!(
            SearchError::OutOfRange { index: 3, count: 2 }.to_string(),
            "ordinal 3 is out of range for 2 documents"
        );
    }

    #[test]
    fn client_errors() {
        assert!(SearchError::DuplicateDocumentId(1).is_client_error());
        assert!(SearchError::InvalidWord("-".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!SearchError::from(io).is_client_error());
    }
}
