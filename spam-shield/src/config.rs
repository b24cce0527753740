use crate::error::{Result, SpamError};
use crate::model::{ArtifactPaths, DEFAULT_ARTIFACT_DIR, DEFAULT_CLASSIFIER_FILE, DEFAULT_VECTORIZER_FILE};
use crate::normalizer::{NormalizerConfig, StemAlgorithm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `SPAM_SHIELD__MODEL__ARTIFACT_DIR`
pub const ENV_PREFIX: &str = "SPAM_SHIELD";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpamShieldConfig {
    pub model: ModelConfig,
    pub normalizer: NormalizerSettings,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_dir: PathBuf,
    pub vectorizer_file: String,
    pub classifier_file: String,
    /// Load the artifacts at startup instead of on the first request
    pub preload: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            vectorizer_file: DEFAULT_VECTORIZER_FILE.to_string(),
            classifier_file: DEFAULT_CLASSIFIER_FILE.to_string(),
            preload: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizerSettings {
    pub stemmer: StemAlgorithm,
    pub extra_stopwords_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8501".to_string(),
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl SpamShieldConfig {
    /// Read a TOML file. Missing sections and keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpamError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| SpamError::Config(e.to_string()))
    }

    /// Defaults, then the optional TOML file, then `SPAM_SHIELD__*` environment
    /// variables, each layer overriding the previous one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())
            .map_err(|e| SpamError::Config(e.to_string()))?;

        let mut builder = ::config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            if !path.is_file() {
                return Err(SpamError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                ::config::File::from(path.to_path_buf()).format(::config::FileFormat::Toml),
            );
        }

        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SpamError::Config(e.to_string()))
    }

    /// Normalizer settings resolved into a ready config, reading the extra
    /// stopword file if one is set
    pub fn normalizer_config(&self) -> Result<NormalizerConfig> {
        let config = NormalizerConfig::default().with_stemmer(self.normalizer.stemmer);

        match &self.normalizer.extra_stopwords_path {
            Some(path) => config.with_extra_stopwords(path),
            None => Ok(config),
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            vectorizer: self.model.artifact_dir.join(&self.model.vectorizer_file),
            classifier: self.model.artifact_dir.join(&self.model.classifier_file),
        }
    }
}
