use std::collections::BTreeSet;

use crate::engine::SearchEngine;
use crate::{DocId, ExecutionMode};

/// Remove every document whose set of terms equals that of an earlier document.
///
/// Term frequencies are ignored. Returns the removed ids in insertion order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocId> {
    let duplicates: Vec<DocId> = {
        let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
        engine
            .iter()
            .filter(|&id| {
                let words: Vec<&str> = engine.word_frequencies(id).keys().map(String::as_str).collect();
                !seen.insert(words)
            })
            .collect()
    };

    for &id in &duplicates {
        tracing::info!(id, "found duplicate document id");
        engine.remove_document(id, ExecutionMode::Sequential);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStatus;

    #[test]
    fn removes_later_documents_with_same_terms() {
        let mut engine = SearchEngine::from_stop_words_text("and with").unwrap();
        let docs = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in docs {
            engine.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }

        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![3, 4, 5, 7]);
        assert_eq!(engine.document_count(), 5);
        assert_eq!(engine.iter().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn partial_overlap_is_kept() {
        let mut engine = SearchEngine::default();
        engine.add_document(1, "cat dog", DocumentStatus::Actual, &[]).unwrap();
        engine.add_document(2, "cat dog bird", DocumentStatus::Actual, &[]).unwrap();
        assert!(remove_duplicates(&mut engine).is_empty());
    }
}
