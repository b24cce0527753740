//! Pre-trained model artifacts
//!
//! A fitted vectorizer and a fitted classifier, exported to JSON by the
//! training pipeline and loaded read-only at startup.

pub mod cache;
pub mod classifier;
pub mod vectorizer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, SpamError};
pub use cache::ModelCache;
pub use classifier::{Classifier, ClassifierArtifact, Decision};
pub use vectorizer::{FeatureVector, TextVectorizer, VectorizerArtifact, VectorizerKind};

pub const DEFAULT_ARTIFACT_DIR: &str = "Model";
pub const DEFAULT_VECTORIZER_FILE: &str = "spam_vectorizer.json";
pub const DEFAULT_CLASSIFIER_FILE: &str = "spam_classifier.json";

/// Locations of the two artifact files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(DEFAULT_VECTORIZER_FILE),
            classifier: dir.join(DEFAULT_CLASSIFIER_FILE),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACT_DIR)
    }
}

/// Fitted vectorizer and classifier, immutable once loaded
#[derive(Debug, Clone)]
pub struct SpamModel {
    pub vectorizer: TextVectorizer,
    pub classifier: Classifier,
}

/// What was loaded, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub vectorizer_kind: VectorizerKind,
    pub vocabulary_size: usize,
    pub classifier_kind: &'static str,
    pub n_features: usize,
}

impl SpamModel {
    /// Pair a vectorizer with a classifier, checking their dimensions agree
    pub fn new(vectorizer: TextVectorizer, classifier: Classifier, source: &Path) -> Result<Self> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(SpamError::invalid(
                source,
                format!(
                    "classifier expects {} features, vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.n_features()
                ),
            ));
        }

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Vectorize normalized text and run the classifier on it
    pub fn predict(&self, normalized: &str) -> Decision {
        let features = self.vectorizer.transform(normalized);
        debug!(nnz = features.nnz(), "Vectorized input");
        self.classifier.predict(&features)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            vectorizer_kind: self.vectorizer.kind(),
            vocabulary_size: self.vectorizer.vocabulary().len(),
            classifier_kind: self.classifier.kind_name(),
            n_features: self.classifier.n_features(),
        }
    }
}

/// Read both artifacts from disk.
///
/// Either file missing is `ArtifactNotFound`, a failed read is `Io`, and
/// malformed or mismatched content is `InvalidArtifact`.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<SpamModel> {
    for path in [&paths.vectorizer, &paths.classifier] {
        if !path.is_file() {
            return Err(SpamError::ArtifactNotFound { path: path.clone() });
        }
    }

    let vectorizer_artifact: VectorizerArtifact = read_json(&paths.vectorizer)?;
    let vectorizer = TextVectorizer::from_artifact(vectorizer_artifact, &paths.vectorizer)?;

    let classifier_artifact: ClassifierArtifact = read_json(&paths.classifier)?;
    let classifier = Classifier::from_artifact(classifier_artifact, &paths.classifier)?;

    let model = SpamModel::new(vectorizer, classifier, &paths.classifier)?;

    info!(
        "Loaded model artifacts: {:?} vectorizer with {} terms, {}",
        model.vectorizer.kind(),
        model.vectorizer.n_features(),
        model.classifier
    );

    Ok(model)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SpamError::ArtifactNotFound {
            path: path.to_path_buf(),
        },
        _ => SpamError::Io(format!("{}: {}", path.display(), e)),
    })?;

    serde_json::from_str(&content).map_err(|e| SpamError::invalid(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VECTORIZER: &str = r#"{
        "kind": "count",
        "vocabulary": {"free": 0, "money": 1, "lunch": 2}
    }"#;

    const CLASSIFIER: &str = r#"{
        "kind": "logistic_regression",
        "coef": [1.5, 1.0, -2.0],
        "intercept": -0.5
    }"#;

    fn write_artifacts(dir: &Path, vectorizer: &str, classifier: &str) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(dir);
        fs::write(&paths.vectorizer, vectorizer).unwrap();
        fs::write(&paths.classifier, classifier).unwrap();
        paths
    }

    #[test]
    fn test_load_and_predict() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), VECTORIZER, CLASSIFIER);

        let model = load_artifacts(&paths).unwrap();
        assert_eq!(model.summary().vocabulary_size, 3);
        assert_eq!(model.summary().classifier_kind, "logistic_regression");

        assert_eq!(model.predict("free money").class, 1);
        assert_eq!(model.predict("lunch").class, 0);
    }

    #[test]
    fn test_missing_vectorizer() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.classifier, CLASSIFIER).unwrap();

        match load_artifacts(&paths) {
            Err(SpamError::ArtifactNotFound { path }) => assert_eq!(path, paths.vectorizer),
            other => panic!("expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_classifier() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.vectorizer, VECTORIZER).unwrap();

        match load_artifacts(&paths) {
            Err(SpamError::ArtifactNotFound { path }) => assert_eq!(path, paths.classifier),
            other => panic!("expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), "{not json", CLASSIFIER);

        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, SpamError::InvalidArtifact { .. }));
    }

    #[test]
    fn test_unreadable_artifact_is_io_error() {
        let dir = TempDir::new().unwrap();

        // A directory exists but cannot be read as a file
        let err = read_json::<serde_json::Value>(dir.path()).unwrap_err();
        assert!(matches!(err, SpamError::Io(_)), "{:?}", err);
        assert!(!err.is_artifact_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        let classifier = r#"{"kind": "logistic_regression", "coef": [1.0, 1.0], "intercept": 0.0}"#;
        let paths = write_artifacts(dir.path(), VECTORIZER, classifier);

        let err = load_artifacts(&paths).unwrap_err();
        assert!(err.to_string().contains("expects 2 features"), "{}", err);
    }
}
