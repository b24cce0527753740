//! Stemming algorithm selection

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::porter::PorterStemmer;

/// Which stemmer the normalizer applies to surviving tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemAlgorithm {
    /// Original Porter rules with NLTK extensions (matches the trained vocabulary)
    #[default]
    Porter,
    /// Snowball English (Porter2)
    Snowball,
    /// Lowercase only, no suffix stripping
    None,
}

impl std::str::FromStr for StemAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "porter" => Ok(StemAlgorithm::Porter),
            "snowball" | "porter2" => Ok(StemAlgorithm::Snowball),
            "none" => Ok(StemAlgorithm::None),
            other => Err(format!("unknown stemmer: {}", other)),
        }
    }
}

impl fmt::Display for StemAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StemAlgorithm::Porter => write!(f, "porter"),
            StemAlgorithm::Snowball => write!(f, "snowball"),
            StemAlgorithm::None => write!(f, "none"),
        }
    }
}

/// A constructed stemmer for one algorithm
pub(crate) enum WordStemmer {
    Porter(PorterStemmer),
    Snowball(Stemmer),
    Identity,
}

impl WordStemmer {
    pub(crate) fn new(algorithm: StemAlgorithm) -> Self {
        match algorithm {
            StemAlgorithm::Porter => WordStemmer::Porter(PorterStemmer::new()),
            StemAlgorithm::Snowball => WordStemmer::Snowball(Stemmer::create(Algorithm::English)),
            StemAlgorithm::None => WordStemmer::Identity,
        }
    }

    pub(crate) fn stem(&self, word: &str) -> String {
        match self {
            WordStemmer::Porter(porter) => porter.stem(word),
            WordStemmer::Snowball(stemmer) => stemmer.stem(&word.to_lowercase()).into_owned(),
            WordStemmer::Identity => word.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("porter".parse::<StemAlgorithm>(), Ok(StemAlgorithm::Porter));
        assert_eq!("Snowball".parse::<StemAlgorithm>(), Ok(StemAlgorithm::Snowball));
        assert_eq!("none".parse::<StemAlgorithm>(), Ok(StemAlgorithm::None));
        assert!("lancaster".parse::<StemAlgorithm>().is_err());
    }

    #[test]
    fn test_stemmers_disagree_where_expected() {
        let porter = WordStemmer::new(StemAlgorithm::Porter);
        let snowball = WordStemmer::new(StemAlgorithm::Snowball);

        assert_eq!(porter.stem("happy"), "happi");
        assert_eq!(snowball.stem("happy"), "happi");

        // Porter2 treats `gener` as a fixed prefix
        assert_eq!(porter.stem("generously"), "gener");
        assert_eq!(snowball.stem("generously"), "generous");
    }

    #[test]
    fn test_identity_lowercases() {
        let identity = WordStemmer::new(StemAlgorithm::None);
        assert_eq!(identity.stem("URL"), "url");
        assert_eq!(identity.stem("running"), "running");
    }
}
