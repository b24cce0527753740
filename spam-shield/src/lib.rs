//! spam-shield: spam/ham classification for email text
//!
//! Raw email text is normalized into a sequence of stems, vectorized with a
//! frozen pre-trained vocabulary and scored by a pre-trained classifier.
//!
//! # Example
//!
//! ```no_run
//! use spam_shield::{NormalizerConfig, SpamClassifier};
//!
//! let classifier = SpamClassifier::from_dir("Model", NormalizerConfig::default());
//! let result = classifier.classify("WIN FREE MONEY NOW!!! Click http://scam.biz")?;
//! println!("{} ({:.2}%)", result.label, result.confidence_percent);
//! # Ok::<(), spam_shield::SpamError>(())
//! ```
//!
//! # Modules
//!
//! - [`normalizer`]: text cleanup, stopwords and stemming
//! - [`model`]: artifact formats, loading and caching
//! - [`inference`]: the classify entry points
//! - [`config`]: configuration management
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod inference;
pub mod logging;
pub mod model;
pub mod normalizer;

// Re-export commonly used types
pub use self::config::SpamShieldConfig;
pub use error::{Result, SpamError};
pub use inference::{classify, Label, PredictionResult, SpamClassifier};
pub use model::{load_artifacts, ArtifactPaths, ModelCache, ModelSummary, SpamModel};
pub use normalizer::{Normalizer, NormalizerConfig, StemAlgorithm};
