use rayon::prelude::*;

use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::{DocId, DocumentStatus, ExecutionMode};

/// Plus-terms of `query` present in document `id`, together with its status.
///
/// Any minus-term present in the document empties the list. Sequential mode
/// yields terms in ascending lexical order; parallel mode yields the same set.
/// The returned terms borrow from the index.
pub fn match_document<'a>(
    index: &'a InvertedIndex,
    query: &Query<'_>,
    id: DocId,
    mode: ExecutionMode,
) -> Result<(Vec<&'a str>, DocumentStatus)> {
    let (words, status) = index.document(id).ok_or(SearchError::UnknownDocument(id))?;

    let excluded = match mode {
        ExecutionMode::Sequential => query.minus_words.iter().any(|word| words.contains_key(*word)),
        ExecutionMode::Parallel => query.minus_words.par_iter().any(|word| words.contains_key(*word)),
    };
    if excluded {
        return Ok((Vec::new(), status));
    }

    let lookup = |word: &&str| words.get_key_value(*word).map(|(term, _)| term.as_str());
    let matched: Vec<&'a str> = match mode {
        ExecutionMode::Sequential => query.plus_words.iter().filter_map(lookup).collect(),
        ExecutionMode::Parallel => query.plus_words.par_iter().filter_map(lookup).collect(),
    };
    Ok((matched, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop_words::StopWords;

    #[test]
    fn minus_word_empties_match() {
        let mut index = InvertedIndex::new(StopWords::default());
        index.add(0, "white cat fancy collar", DocumentStatus::Irrelevant, &[]).unwrap();
        let query = Query::parse("cat white -collar", index.stop_words()).unwrap();
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let (words, status) = match_document(&index, &query, 0, mode).unwrap();
            assert!(words.is_empty());
            assert_eq!(status, DocumentStatus::Irrelevant);
        }
    }

    #[test]
    fn unknown_document() {
        let index = InvertedIndex::default();
        let query = Query::parse("cat", index.stop_words()).unwrap();
        assert!(matches!(
            match_document(&index, &query, 3, ExecutionMode::Sequential),
            Err(SearchError::UnknownDocument(3))
        ));
    }
}
