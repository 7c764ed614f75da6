use std::path::Path;
use std::sync::{Arc, Mutex};

use liturgia_core::Result;
use liturgia_embeddings::Embedder;
use tracing::debug;

use crate::HymnCorpus;

/// Loads the hymn corpus at most once per process.
///
/// A failed load leaves the cache empty so the next call retries.
#[derive(Default)]
pub struct CorpusCache {
    slot: Mutex<Option<Arc<HymnCorpus>>>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached corpus, loading it from `path` on first use
    pub fn get_or_load(&self, path: &Path, embedder: Arc<dyn Embedder>) -> Result<Arc<HymnCorpus>> {
        self.get_or_init(|| HymnCorpus::load(path, embedder))
    }

    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<HymnCorpus>>
    where
        F: FnOnce() -> Result<HymnCorpus>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(corpus) = slot.as_ref() {
            debug!("Reusing loaded corpus ({} hymns)", corpus.len());
            return Ok(corpus.clone());
        }

        let corpus = Arc::new(init()?);
        *slot = Some(corpus.clone());
        Ok(corpus)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Drop the cached corpus
    pub fn reset(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liturgia_embeddings::HashEmbedder;

    const CATALOG: &str = r#"{"hymns": [
        {"title": "Servo per amore", "categories": ["offertory"]}
    ]}"#;

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new(16).unwrap())
    }

    #[test]
    fn test_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canti.json");
        std::fs::write(&path, CATALOG).unwrap();

        let cache = CorpusCache::new();
        let a = cache.get_or_load(&path, embedder()).unwrap();

        // A second load must not touch the file again.
        std::fs::remove_file(&path).unwrap();
        let b = cache.get_or_load(&path, embedder()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canti.json");

        let cache = CorpusCache::new();
        assert!(cache.get_or_load(&path, embedder()).is_err());
        assert!(!cache.is_loaded());

        std::fs::write(&path, CATALOG).unwrap();
        assert_eq!(cache.get_or_load(&path, embedder()).unwrap().len(), 1);

        cache.reset();
        assert!(!cache.is_loaded());
    }
}
