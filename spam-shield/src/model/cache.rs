//! Process-wide artifact cache
//!
//! Artifacts are read from disk at most once. Concurrent first calls are
//! serialized on a mutex; after that every reader gets the same `Arc`
//! without locking. A failed load is cached too and handed back as-is.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{error, warn};

use super::{load_artifacts, ArtifactPaths, SpamModel};
use crate::error::Result;

pub struct ModelCache {
    paths: ArtifactPaths,
    slot: OnceLock<Result<Arc<SpamModel>>>,
    init_lock: Mutex<()>,
}

impl fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCache")
            .field("paths", &self.paths)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl ModelCache {
    /// Cache that loads from `paths` on first use
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            slot: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Cache already holding a model; never touches the disk
    pub fn with_model(model: SpamModel) -> Self {
        let cache = Self::new(ArtifactPaths::default());
        let _ = cache.slot.set(Ok(Arc::new(model)));
        cache
    }

    /// Get the model, loading it on the first call
    pub fn get(&self) -> Result<Arc<SpamModel>> {
        if let Some(cached) = self.slot.get() {
            return cached.clone();
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited
        if let Some(cached) = self.slot.get() {
            return cached.clone();
        }

        let loaded = load_artifacts(&self.paths).map(Arc::new);
        if let Err(e) = &loaded {
            error!("Failed to load model artifacts: {}", e);
            warn!("Classification is unavailable until restart");
        }

        let _ = self.slot.set(loaded.clone());
        loaded
    }

    /// True once a model has been loaded successfully
    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }

    /// True once a load has been attempted, successful or not
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpamError;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn write_artifacts(paths: &ArtifactPaths) {
        fs::write(
            &paths.vectorizer,
            r#"{"kind": "count", "vocabulary": {"win": 0}}"#,
        )
        .unwrap();
        fs::write(
            &paths.classifier,
            r#"{"kind": "logistic_regression", "coef": [2.0], "intercept": -1.0}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_loads_once() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_artifacts(&paths);

        let cache = ModelCache::new(paths.clone());
        assert!(!cache.is_initialized());

        let first = cache.get().unwrap();
        assert!(cache.is_loaded());

        // Removing the files does not matter once loaded
        fs::remove_file(&paths.vectorizer).unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failure_is_not_retried() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let cache = ModelCache::new(paths.clone());

        let err = cache.get().unwrap_err();
        assert!(matches!(err, SpamError::ArtifactNotFound { .. }));
        assert!(cache.is_initialized());
        assert!(!cache.is_loaded());

        // Artifacts appearing later are not picked up
        write_artifacts(&paths);
        assert_eq!(cache.get().unwrap_err(), err);
    }

    #[test]
    fn test_concurrent_first_load() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_artifacts(&paths);

        let cache = Arc::new(ModelCache::new(paths));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get().unwrap())
            })
            .collect();

        let models: Vec<Arc<SpamModel>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for model in &models[1..] {
            assert!(Arc::ptr_eq(&models[0], model));
        }
    }
}
