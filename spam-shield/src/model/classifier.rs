//! Pre-trained binary classifiers
//!
//! Linear models exported from scikit-learn. Each one answers the same two
//! questions for a feature vector: which class wins, and how likely spam is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::vectorizer::FeatureVector;
use crate::error::{Result, SpamError};

/// Weights exported either flat or as scikit-learn's `(1, n)` matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weights {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

/// A scalar exported either bare or as a one-element array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bare(f64),
    Wrapped(Vec<f64>),
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// On-disk form of a fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    MultinomialNb {
        #[serde(default = "default_classes")]
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
    BernoulliNb {
        #[serde(default = "default_classes")]
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
        #[serde(default = "default_binarize")]
        binarize: Option<f64>,
    },
    LogisticRegression {
        #[serde(default = "default_classes")]
        classes: Vec<i64>,
        coef: Weights,
        intercept: Scalar,
    },
}

fn default_binarize() -> Option<f64> {
    Some(0.0)
}

/// Per-class log-likelihood tables for the naive Bayes variants
#[derive(Debug, Clone)]
pub struct NaiveBayesTables {
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

/// A validated classifier ready for prediction
#[derive(Debug, Clone)]
pub enum Classifier {
    MultinomialNb(NaiveBayesTables),
    BernoulliNb {
        tables: NaiveBayesTables,
        /// `log(1 - p)` per feature, per class
        neg_log_prob: [Vec<f64>; 2],
        neg_log_prob_sum: [f64; 2],
        binarize: Option<f64>,
    },
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
}

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Numeric class, `0` ham or `1` spam
    pub class: i64,
    /// Probability of the spam class
    pub spam_probability: f64,
}

impl Classifier {
    /// Validate an artifact. `path` is only used for error messages.
    pub fn from_artifact(artifact: ClassifierArtifact, path: &Path) -> Result<Self> {
        match artifact {
            ClassifierArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                check_classes(&classes, path)?;
                let tables = NaiveBayesTables::new(class_log_prior, feature_log_prob, path)?;
                Ok(Classifier::MultinomialNb(tables))
            }
            ClassifierArtifact::BernoulliNb {
                classes,
                class_log_prior,
                feature_log_prob,
                binarize,
            } => {
                check_classes(&classes, path)?;
                let tables = NaiveBayesTables::new(class_log_prior, feature_log_prob, path)?;

                if tables.feature_log_prob.iter().flatten().any(|&p| p > 0.0) {
                    return Err(SpamError::invalid(path, "feature_log_prob must be <= 0"));
                }

                let neg_log_prob = [
                    tables.feature_log_prob[0].iter().map(|p| log1m_exp(*p)).collect::<Vec<_>>(),
                    tables.feature_log_prob[1].iter().map(|p| log1m_exp(*p)).collect::<Vec<_>>(),
                ];
                let neg_log_prob_sum = [neg_log_prob[0].iter().sum(), neg_log_prob[1].iter().sum()];

                Ok(Classifier::BernoulliNb {
                    tables,
                    neg_log_prob,
                    neg_log_prob_sum,
                    binarize,
                })
            }
            ClassifierArtifact::LogisticRegression {
                classes,
                coef,
                intercept,
            } => {
                check_classes(&classes, path)?;

                let coef = match coef {
                    Weights::Flat(row) => row,
                    Weights::Nested(mut rows) if rows.len() == 1 => rows.remove(0),
                    Weights::Nested(rows) => {
                        return Err(SpamError::invalid(
                            path,
                            format!("binary model expects 1 coefficient row, got {}", rows.len()),
                        ))
                    }
                };
                let intercept = match intercept {
                    Scalar::Bare(value) => value,
                    Scalar::Wrapped(values) if values.len() == 1 => values[0],
                    Scalar::Wrapped(values) => {
                        return Err(SpamError::invalid(
                            path,
                            format!("binary model expects 1 intercept, got {}", values.len()),
                        ))
                    }
                };

                Ok(Classifier::LogisticRegression { coef, intercept })
            }
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::MultinomialNb(tables) => tables.n_features(),
            Classifier::BernoulliNb { tables, .. } => tables.n_features(),
            Classifier::LogisticRegression { coef, .. } => coef.len(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Classifier::MultinomialNb(_) => "multinomial_nb",
            Classifier::BernoulliNb { .. } => "bernoulli_nb",
            Classifier::LogisticRegression { .. } => "logistic_regression",
        }
    }

    /// Predict the class of `x` and the probability that it is spam.
    ///
    /// Ties go to ham, matching argmax over `[ham, spam]`.
    pub fn predict(&self, x: &FeatureVector) -> Decision {
        let (ham_score, spam_score) = match self {
            Classifier::MultinomialNb(tables) => tables.joint_log_likelihood(x),
            Classifier::BernoulliNb {
                tables,
                neg_log_prob,
                neg_log_prob_sum,
                binarize,
            } => {
                let mut jll = [
                    tables.class_log_prior[0] + neg_log_prob_sum[0],
                    tables.class_log_prior[1] + neg_log_prob_sum[1],
                ];
                for (i, value) in x.iter() {
                    let present = match binarize {
                        Some(threshold) => {
                            if value > *threshold {
                                1.0
                            } else {
                                0.0
                            }
                        }
                        None => value,
                    };
                    for c in 0..2 {
                        jll[c] += present * (tables.feature_log_prob[c][i] - neg_log_prob[c][i]);
                    }
                }
                (jll[0], jll[1])
            }
            Classifier::LogisticRegression { coef, intercept } => (0.0, x.dot(coef) + intercept),
        };

        let margin = spam_score - ham_score;
        Decision {
            class: if margin > 0.0 { 1 } else { 0 },
            spam_probability: sigmoid(margin),
        }
    }

    /// Probability of the spam class
    pub fn predict_proba(&self, x: &FeatureVector) -> f64 {
        self.predict(x).spam_probability
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} features)", self.kind_name(), self.n_features())
    }
}

impl NaiveBayesTables {
    fn new(class_log_prior: Vec<f64>, feature_log_prob: Vec<Vec<f64>>, path: &Path) -> Result<Self> {
        let class_log_prior: [f64; 2] = class_log_prior.try_into().map_err(|v: Vec<f64>| {
            SpamError::invalid(path, format!("class_log_prior must have 2 entries, got {}", v.len()))
        })?;
        let feature_log_prob: [Vec<f64>; 2] =
            feature_log_prob.try_into().map_err(|v: Vec<Vec<f64>>| {
                SpamError::invalid(path, format!("feature_log_prob must have 2 rows, got {}", v.len()))
            })?;

        if feature_log_prob[0].len() != feature_log_prob[1].len() {
            return Err(SpamError::invalid(path, "feature_log_prob rows differ in length"));
        }

        Ok(Self {
            class_log_prior,
            feature_log_prob,
        })
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    fn joint_log_likelihood(&self, x: &FeatureVector) -> (f64, f64) {
        (
            self.class_log_prior[0] + x.dot(&self.feature_log_prob[0]),
            self.class_log_prior[1] + x.dot(&self.feature_log_prob[1]),
        )
    }
}

fn check_classes(classes: &[i64], path: &Path) -> Result<()> {
    if classes != [0, 1] {
        return Err(SpamError::invalid(
            path,
            format!("expected classes [0, 1], got {:?}", classes),
        ));
    }
    Ok(())
}

/// Numerically stable logistic function
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `log(1 - exp(x))` for `x <= 0`
fn log1m_exp(x: f64) -> f64 {
    if x > -std::f64::consts::LN_2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}
