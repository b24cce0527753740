//! Email text normalization
//!
//! Turns raw, noisy email text into the space-joined stem sequence the
//! classifier vocabulary was built from. The steps run in a fixed order:
//!
//! 1. emoji to `:name:` text
//! 2. lowercase
//! 3. `<...>` tags to a space
//! 4. `http...` / `www...` runs to `URL`
//! 5. digit runs to `NUMBERS`
//! 6. anything but ASCII letters to a space
//! 7. whitespace collapsed and trimmed
//! 8. stopwords dropped, remaining words stemmed
//! 9. stems joined with single spaces
//!
//! The sentinels are inserted in uppercase after lowercasing; the stemmer
//! lowercases them again, so they come out as [`URL_TOKEN`] and
//! [`NUMBER_TOKEN`].

pub mod emoji;
pub mod porter;
pub mod stemmer;
pub mod stopwords;

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::Result;
pub use porter::PorterStemmer;
pub use stemmer::StemAlgorithm;
use stemmer::WordStemmer;

/// Placeholder inserted for URLs (step 4)
pub const URL_SENTINEL: &str = "URL";
/// Placeholder inserted for digit runs (step 5)
pub const NUMBERS_SENTINEL: &str = "NUMBERS";
/// Token a URL contributes to the normalized output
pub const URL_TOKEN: &str = "url";
/// Token a digit run contributes to the normalized output
pub const NUMBER_TOKEN: &str = "number";

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"http\S+|www\S+").expect("url pattern is valid"))
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

fn non_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z]").expect("letter pattern is valid"))
}

/// Stopword set and stemmer the normalizer runs with.
///
/// Both must match what the classifier was trained with; nothing checks this
/// at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    pub stopwords: HashSet<String>,
    pub stemmer: StemAlgorithm,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stopwords: stopwords::english(),
            stemmer: StemAlgorithm::Porter,
        }
    }
}

impl NormalizerConfig {
    /// Use a different stemming algorithm
    pub fn with_stemmer(mut self, stemmer: StemAlgorithm) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Merge the words from a stopword file into the set
    pub fn with_extra_stopwords<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.stopwords.extend(stopwords::load_file(path)?);
        Ok(self)
    }
}

/// Deterministic raw-text to token-string mapping
pub struct Normalizer {
    stopwords: HashSet<String>,
    algorithm: StemAlgorithm,
    stemmer: WordStemmer,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .field("stemmer", &self.algorithm)
            .finish()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            stemmer: WordStemmer::new(config.stemmer),
            algorithm: config.stemmer,
            stopwords: config.stopwords,
        }
    }

    /// Normalize `text` into space-separated stems. Never fails; text with
    /// nothing usable yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Same as [`normalize`](Self::normalize) but returns the stems unjoined
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned = clean(text);

        cleaned
            .split_ascii_whitespace()
            .filter(|word| !self.is_stopword(word))
            .map(|word| self.stemmer.stem(word))
            .filter(|stem| !stem.is_empty())
            .collect()
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Stem one word with the configured algorithm
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }

    pub fn stem_algorithm(&self) -> StemAlgorithm {
        self.algorithm
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

/// Steps 1 to 6: the regex cleanup before tokenization
fn clean(text: &str) -> String {
    let text = emoji::demojize(text);
    let text = text.to_lowercase();
    let text = tag_re().replace_all(&text, " ");
    let text = url_re().replace_all(&text, URL_SENTINEL);
    let text = digits_re().replace_all(&text, NUMBERS_SENTINEL);
    non_letter_re().replace_all(&text, " ").into_owned()
}
