//! Bundled English stopword list
//!
//! Same 179 words as the NLTK `english` corpus the classifier vocabulary was
//! built with. Contractions are kept with their apostrophes even though the
//! normalizer splits on them; they never match a cleaned token and are only
//! here so the set matches the training-time list exactly.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SpamError};

pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
    "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Build the default stopword set
pub fn english() -> HashSet<String> {
    ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

/// Read a stopword file: one word per line, blank lines and `#` comments ignored.
/// Words are lowercased so they match the normalizer's tokens.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SpamError::Config(format!(
            "Failed to read stopword file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(parse(&content))
}

fn parse(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 179);
        assert_eq!(english().len(), 179);
    }

    #[test]
    fn test_common_function_words_present() {
        let set = english();
        for word in ["the", "and", "is", "you", "now", "won", "at", "for"] {
            assert!(set.contains(word), "missing stopword {word}");
        }
        assert!(!set.contains("free"));
        assert!(!set.contains("url"));
    }

    #[test]
    fn test_parse_stopword_file() {
        let words = parse("# custom list\nFoo\n\n  bar  # trailing comment\n#only comment\n");
        assert_eq!(words.len(), 2);
        assert!(words.contains("foo"));
        assert!(words.contains("bar"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/nonexistent/stopwords.txt").unwrap_err();
        assert!(matches!(err, SpamError::Config(_)));
    }
}
