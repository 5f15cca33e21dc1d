use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_into_words};

const MINUS_MARKER: char = '-';

/// A parsed query. Terms borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
    is_stop: bool,
}

impl<'q> Query<'q> {
    /// Parse `text` into plus and minus terms, dropping stop words.
    ///
    /// A term given both with and without the minus marker ends up only in
    /// `minus_words`.
    pub fn parse(text: &'q str, stop_words: &StopWords) -> Result<Self> {
        let mut plus_words = BTreeSet::new();
        let mut minus_words = BTreeSet::new();
        for word in split_into_words(text) {
            let word = parse_query_word(word, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                minus_words.insert(word.data);
            } else {
                plus_words.insert(word.data);
            }
        }
        plus_words.retain(|word| !minus_words.contains(word));
        Ok(Self { plus_words, minus_words })
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn parse_query_word<'q>(text: &'q str, stop_words: &StopWords) -> Result<QueryWord<'q>> {
    let (data, is_minus) = match text.strip_prefix(MINUS_MARKER) {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with(MINUS_MARKER) || !is_valid_word(data) {
        return Err(SearchError::InvalidWord(text.to_string()));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}
