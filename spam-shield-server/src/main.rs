//! spam-shield-server: spam classification over HTTP

use spam_shield::logging::init_tracing;
use spam_shield::{ModelCache, Normalizer, SpamClassifier, SpamShieldConfig};
use spam_shield_server::ApiServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SpamShieldConfig::load(config_path.as_deref())?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting spam-shield-server v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file specified, using defaults and environment"),
    }

    let paths = config.artifact_paths();
    info!("  Vectorizer: {}", paths.vectorizer.display());
    info!("  Classifier: {}", paths.classifier.display());
    info!("  Stemmer: {}", config.normalizer.stemmer);

    let normalizer = Normalizer::new(config.normalizer_config()?);
    let classifier = Arc::new(SpamClassifier::new(normalizer, ModelCache::new(paths)));

    if config.model.preload {
        let preload = Arc::clone(&classifier);
        match tokio::task::spawn_blocking(move || preload.preload()).await? {
            Ok(()) => info!("Model artifacts loaded"),
            Err(e) => {
                error!("Model artifacts unavailable: {}", e);
                warn!("Serving without a model; /api/classify will return 503");
            }
        }
    }

    let server = ApiServer::new(
        classifier,
        config.server.listen_addr.clone(),
        config.server.max_body_bytes,
    );
    server.run().await?;

    Ok(())
}
