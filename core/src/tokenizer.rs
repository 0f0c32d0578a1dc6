use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::Term;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "the", "is", "in", "of", "for", "and", "to", "on", "by", "that", "it", "from",
            "this", "with", "as", "at", "are", "was", "were", "has", "have", "had", "be", "been",
            "but", "or", "not", "which", "will", "through",
        ];
        words.iter().copied().collect()
    };
}

/// Stopword membership. Expects an already lowercased token.
pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text into terms: runs of letters, digits and `_`, lowercased, with stopwords removed.
///
/// Order follows the input and repeated terms are kept; deduplication is left to the index.
pub fn tokenize(text: &str) -> Vec<Term> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert_eq!(t, vec!["running", "runner", "s", "run"]);
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(tokenize("snake_case v2 -- 42"), vec!["snake_case", "v2", "42"]);
    }

    #[test]
    fn connector_punctuation_and_marks_split_tokens() {
        let t = tokenize("foo\u{203F}bar baz\u{FF3F}qux cafe\u{301} a\u{200D}b");
        assert_eq!(t, vec!["foo", "bar", "baz", "qux", "cafe", "b"]);
    }

    #[test]
    fn stopword_lookup_is_lowercase_only() {
        assert!(is_stopword("through"));
        assert!(!is_stopword("THROUGH"));
        assert!(!is_stopword("cat"));
    }
}
