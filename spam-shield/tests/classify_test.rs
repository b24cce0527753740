//! End-to-end classification against artifacts written to a temp directory

use serde_json::json;
use spam_shield::{
    load_artifacts, ArtifactPaths, Label, ModelCache, Normalizer, NormalizerConfig, SpamClassifier,
    SpamError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SPAM_TERMS: &[&str] = &["win", "free", "money", "click", "url", "prize", "claim"];
const HAM_TERMS: &[&str] = &["hi", "see", "tomorrow", "lunch", "meet", "numberspm", "number"];

/// Tf-idf vectorizer plus multinomial naive Bayes, shaped like a real export
fn write_nb_artifacts(dir: &Path) -> ArtifactPaths {
    let terms: Vec<&str> = SPAM_TERMS.iter().chain(HAM_TERMS).copied().collect();
    let vocabulary: serde_json::Map<String, serde_json::Value> = terms
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), json!(i)))
        .collect();

    let spam_row: Vec<f64> = terms
        .iter()
        .map(|t| if SPAM_TERMS.contains(t) { 0.12f64.ln() } else { 0.02f64.ln() })
        .collect();
    let ham_row: Vec<f64> = terms
        .iter()
        .map(|t| if HAM_TERMS.contains(t) { 0.12f64.ln() } else { 0.02f64.ln() })
        .collect();

    let paths = ArtifactPaths::in_dir(dir);
    fs::write(
        &paths.vectorizer,
        json!({
            "kind": "tfidf",
            "vocabulary": vocabulary,
            "idf": vec![1.5; terms.len()],
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        &paths.classifier,
        json!({
            "kind": "multinomial_nb",
            "classes": [0, 1],
            "class_log_prior": [0.87f64.ln(), 0.13f64.ln()],
            "feature_log_prob": [ham_row, spam_row],
        })
        .to_string(),
    )
    .unwrap();
    paths
}

fn classifier(dir: &Path) -> SpamClassifier {
    SpamClassifier::new(
        Normalizer::default(),
        ModelCache::new(write_nb_artifacts(dir)),
    )
}

#[test]
fn test_obvious_spam() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    let result = classifier
        .classify("WIN FREE MONEY NOW!!! Click http://scam.biz")
        .unwrap();

    assert_eq!(result.normalized_text, "win free money click url");
    assert_eq!(result.label, Label::Spam);
    assert!(result.confidence_percent > 50.0);
}

#[test]
fn test_typical_ham() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    let result = classifier
        .classify("Hi, see you at 3pm tomorrow for lunch.")
        .unwrap();

    assert_eq!(result.label, Label::Ham);
    assert!(result.confidence_percent < 50.0);
}

#[test]
fn test_empty_input_never_loads_model() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    assert_eq!(classifier.classify(""), Err(SpamError::EmptyInput));
    assert_eq!(classifier.classify("  \n "), Err(SpamError::EmptyInput));
    assert!(!classifier.is_model_loaded());
}

#[test]
fn test_punctuation_only_falls_back_to_prior() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    let result = classifier.classify("?!?! ... ***").unwrap();
    assert_eq!(result.normalized_text, "");
    // zero vector: posterior equals the class prior
    assert_eq!(result.label, Label::Ham);
    assert_eq!(result.confidence_percent, 13.0);
}

#[test]
fn test_confidence_bounds_and_rounding() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    let inputs = [
        "WIN WIN WIN FREE FREE PRIZE claim now www.prize.example",
        "See you tomorrow, meet at lunch",
        "Random words with no known vocabulary",
        "555 1234 99",
        "🎉🎉🎉",
    ];
    for text in inputs {
        let result = classifier.classify(text).unwrap();
        assert!((0.0..=100.0).contains(&result.confidence_percent));
        assert!((0.0..=1.0).contains(&result.spam_probability));

        let scaled = result.confidence_percent * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{text}: {}", result.confidence_percent);
    }
}

#[test]
fn test_missing_artifacts_reported_once() {
    let dir = TempDir::new().unwrap();
    let classifier = SpamClassifier::from_dir(dir.path(), NormalizerConfig::default());

    let first = classifier.classify("hello there").unwrap_err();
    assert!(matches!(first, SpamError::ArtifactNotFound { .. }));

    // Files appearing later do not rescue a failed load
    write_nb_artifacts(dir.path());
    assert_eq!(classifier.classify("hello there").unwrap_err(), first);
}

#[test]
fn test_load_artifacts_summary() {
    let dir = TempDir::new().unwrap();
    let model = load_artifacts(&write_nb_artifacts(dir.path())).unwrap();
    let summary = model.summary();

    assert_eq!(summary.classifier_kind, "multinomial_nb");
    assert_eq!(summary.vocabulary_size, SPAM_TERMS.len() + HAM_TERMS.len());
    assert_eq!(summary.n_features, summary.vocabulary_size);
}

#[test]
fn test_result_serialization() {
    let dir = TempDir::new().unwrap();
    let classifier = classifier(dir.path());

    let result = classifier.classify("Claim your free prize").unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["label"], "spam");
    assert!(value["confidence_percent"].is_number());
    assert_eq!(value["normalized_text"], "claim free prize");
}
