use docrank_core::tokenizer::{is_valid_word, split_into_words};
use docrank_core::{SearchError, StopWords};

#[test]
fn it_splits_on_spaces_only() {
    let words = split_into_words(" белый кот и  модный  ошейник ");
    assert_eq!(words, vec!["белый", "кот", "и", "модный", "ошейник"]);

    let words = split_into_words("белый кот\tи\n модный");
    assert_eq!(words, vec!["белый", "кот\tи\n", "модный"]);
    assert!(!is_valid_word(words[1]));
}

#[test]
fn it_rejects_stop_words_separated_by_tabs() {
    let err = StopWords::from_text("и\tв на").unwrap_err();
    assert!(matches!(err, SearchError::InvalidWord(w) if w == "и\tв"));
}

#[test]
fn it_keeps_case_and_punctuation() {
    let words = split_into_words("Cat, cat! CAT");
    assert_eq!(words, vec!["Cat,", "cat!", "CAT"]);
    assert!(words.iter().all(|w| is_valid_word(w)));
}

#[test]
fn it_builds_stop_words_from_text() {
    let sw = StopWords::from_text("  и в на  и ").unwrap();
    assert_eq!(sw.iter().collect::<Vec<_>>(), vec!["в", "и", "на"]);
    assert!(!sw.contains("И"));
}

#[test]
fn it_rejects_invalid_stop_words() {
    let err = StopWords::new(vec!["ok".to_string(), "b\u{0}ad".to_string()]).unwrap_err();
    assert!(matches!(err, SearchError::InvalidWord(w) if w == "b\u{0}ad"));
}
