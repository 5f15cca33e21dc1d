/// Split text into space-separated words, borrowing from the input.
///
/// Only U+0020 separates words. Tabs, newlines and other control characters
/// stay inside their token so `is_valid_word` can reject them.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it carries no control characters.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_split() {
        assert_eq!(split_into_words("  cat in the  city "), vec!["cat", "in", "the", "city"]);
        assert!(split_into_words("   ").is_empty());
    }

    #[test]
    fn other_whitespace_stays_in_the_token() {
        assert_eq!(split_into_words("cat in\tthe\ncity"), vec!["cat", "in\tthe\ncity"]);
        assert!(!is_valid_word("in\tthe\ncity"));
    }

    #[test]
    fn control_chars_are_invalid() {
        assert!(is_valid_word("пёс"));
        assert!(!is_valid_word("do\u{1}g"));
    }
}
