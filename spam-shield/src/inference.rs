//! Inference adapter
//!
//! Glue between the normalizer and the loaded model: raw text in, a
//! [`PredictionResult`] out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, SpamError};
use crate::model::{ArtifactPaths, ModelCache, SpamModel};
use crate::normalizer::{Normalizer, NormalizerConfig};

/// Classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Label::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for Label {
    type Error = SpamError;

    fn try_from(class: i64) -> Result<Self> {
        match class {
            0 => Ok(Label::Ham),
            1 => Ok(Label::Spam),
            other => Err(SpamError::InvalidArtifact {
                path: Default::default(),
                reason: format!("unknown class label {}", other),
            }),
        }
    }
}

/// Outcome of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    /// P(spam), in [0, 1]
    pub spam_probability: f64,
    /// `spam_probability` as a percentage, rounded to 2 decimals
    pub confidence_percent: f64,
    pub normalized_text: String,
}

/// Percentage rounded to 2 decimals, clamped to [0, 100]
pub fn confidence_percent(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    round_2dp((probability * 100.0).clamp(0.0, 100.0))
}

/// Round to 2 decimals, ties to even (numpy `round` semantics)
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Classify `text` against an already loaded model.
///
/// Text that is empty after trimming is rejected before the model is
/// touched. Text that only becomes empty after normalization is still
/// classified.
pub fn classify(text: &str, normalizer: &Normalizer, model: &SpamModel) -> Result<PredictionResult> {
    if text.trim().is_empty() {
        return Err(SpamError::EmptyInput);
    }

    let tokens = normalizer.tokens(text);
    debug!(chars = text.len(), tokens = tokens.len(), "Normalized input");
    let normalized_text = tokens.join(" ");

    let decision = model.predict(&normalized_text);
    let label = Label::try_from(decision.class)?;

    Ok(PredictionResult {
        label,
        spam_probability: decision.spam_probability,
        confidence_percent: confidence_percent(decision.spam_probability),
        normalized_text,
    })
}

/// Normalizer plus lazily loaded model, shareable across threads
#[derive(Debug)]
pub struct SpamClassifier {
    normalizer: Normalizer,
    cache: ModelCache,
}

impl SpamClassifier {
    pub fn new(normalizer: Normalizer, cache: ModelCache) -> Self {
        Self { normalizer, cache }
    }

    /// Classifier over the default artifact file names in `dir`
    pub fn from_dir<P: AsRef<Path>>(dir: P, config: NormalizerConfig) -> Self {
        Self::new(
            Normalizer::new(config),
            ModelCache::new(ArtifactPaths::in_dir(dir)),
        )
    }

    /// Classifier over a model that is already in memory
    pub fn with_model(normalizer: Normalizer, model: SpamModel) -> Self {
        Self::new(normalizer, ModelCache::with_model(model))
    }

    pub fn classify(&self, text: &str) -> Result<PredictionResult> {
        // Checked here too so empty input never triggers the first load
        if text.trim().is_empty() {
            return Err(SpamError::EmptyInput);
        }

        let model = self.cache.get()?;
        classify(text, &self.normalizer, &model)
    }

    /// Load the artifacts now instead of on the first request
    pub fn preload(&self) -> Result<()> {
        self.cache.get().map(|_| ())
    }

    pub fn model(&self) -> Result<Arc<SpamModel>> {
        self.cache.get()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn artifact_paths(&self) -> &ArtifactPaths {
        self.cache.paths()
    }
}
