//! Frozen bag-of-words vectorizer
//!
//! Reproduces the `transform` side of a fitted scikit-learn `CountVectorizer`
//! or `TfidfVectorizer` from its exported attributes. The vocabulary is never
//! updated; terms outside it are dropped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{Result, SpamError};

/// scikit-learn's default `token_pattern`
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    Count,
    Tfidf,
}

impl VectorizerKind {
    fn default_norm(self) -> Norm {
        match self {
            VectorizerKind::Count => Norm::None,
            VectorizerKind::Tfidf => Norm::L2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
    None,
}

/// On-disk form of a fitted vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub kind: VectorizerKind,
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Absent means the scikit-learn default for `kind`
    #[serde(default)]
    pub norm: Option<Norm>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

/// Sparse feature vector, entries sorted by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dim: usize, entries: Vec<(usize, f64)>) -> Self {
        let mut entries = entries;
        entries.sort_by_key(|(i, _)| *i);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Dot product against a dense weight row
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| v * weights[i]).sum()
    }
}

/// A validated, ready-to-use vectorizer
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    kind: VectorizerKind,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    ngram_range: (usize, usize),
    token_re: Regex,
    lowercase: bool,
    binary: bool,
    sublinear_tf: bool,
    norm: Norm,
}

impl TextVectorizer {
    /// Validate an artifact. `path` is only used for error messages.
    pub fn from_artifact(artifact: VectorizerArtifact, path: &Path) -> Result<Self> {
        let n_features = artifact.vocabulary.len();

        if let Some((term, &index)) = artifact.vocabulary.iter().find(|(_, i)| **i >= n_features) {
            return Err(SpamError::invalid(
                path,
                format!(
                    "vocabulary index {} for '{}' out of range for {} features",
                    index, term, n_features
                ),
            ));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SpamError::invalid(
                path,
                format!("invalid ngram_range ({}, {})", min_n, max_n),
            ));
        }

        match (&artifact.kind, &artifact.idf) {
            (VectorizerKind::Tfidf, None) => {
                return Err(SpamError::invalid(path, "tfidf vectorizer without idf weights"));
            }
            (_, Some(idf)) if idf.len() != n_features => {
                return Err(SpamError::invalid(
                    path,
                    format!("idf has {} weights, vocabulary has {} terms", idf.len(), n_features),
                ));
            }
            _ => {}
        }

        let token_re = Regex::new(&artifact.token_pattern).map_err(|e| {
            SpamError::invalid(path, format!("bad token_pattern: {}", e))
        })?;

        Ok(Self {
            norm: artifact.norm.unwrap_or(artifact.kind.default_norm()),
            kind: artifact.kind,
            vocabulary: artifact.vocabulary,
            idf: match artifact.kind {
                VectorizerKind::Tfidf => artifact.idf,
                VectorizerKind::Count => None,
            },
            ngram_range: artifact.ngram_range,
            token_re,
            lowercase: artifact.lowercase,
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
        })
    }

    pub fn kind(&self) -> VectorizerKind {
        self.kind
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Map a document to its feature vector
    pub fn transform(&self, document: &str) -> FeatureVector {
        let lowered;
        let document = if self.lowercase {
            lowered = document.to_lowercase();
            lowered.as_str()
        } else {
            document
        };

        let tokens: Vec<&str> = self.token_re.find_iter(document).map(|m| m.as_str()).collect();
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();

        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            if n == 1 {
                for token in &tokens {
                    if let Some(&index) = self.vocabulary.get(*token) {
                        *counts.entry(index).or_insert(0.0) += 1.0;
                    }
                }
                continue;
            }

            for window in tokens.windows(n) {
                if let Some(&index) = self.vocabulary.get(&window.join(" ")) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();

        for (index, value) in entries.iter_mut() {
            if self.binary {
                *value = 1.0;
            } else if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if let Some(idf) = &self.idf {
                *value *= idf[*index];
            }
        }

        let scale = match self.norm {
            Norm::None => 1.0,
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
        };
        if scale > 0.0 && scale != 1.0 {
            for (_, value) in entries.iter_mut() {
                *value /= scale;
            }
        }

        FeatureVector::new(self.n_features(), entries)
    }
}
