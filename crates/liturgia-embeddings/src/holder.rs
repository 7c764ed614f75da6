//! Lazy single initialization of the embedding model

use std::sync::{Arc, Mutex};

use liturgia_core::Result;
use tracing::info;

use crate::Embedder;

/// Holds the embedding model once it has been initialized.
///
/// The first `get_or_init` call runs the initializer; later calls return the
/// same instance. A failed initialization leaves the holder empty.
#[derive(Default)]
pub struct ModelHolder {
    slot: Mutex<Option<Arc<dyn Embedder>>>,
}

impl ModelHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<dyn Embedder>>
    where
        F: FnOnce() -> Result<Arc<dyn Embedder>>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(model) = slot.as_ref() {
            return Ok(model.clone());
        }

        let model = init()?;
        info!(
            "Embedding model initialized (dim={}, hash={})",
            model.dim(),
            hex::encode(&model.model_hash()[..4])
        );
        *slot = Some(model.clone());
        Ok(model)
    }

    /// Install `model`, replacing any model already held
    pub fn set(&self, model: Arc<dyn Embedder>) {
        info!(
            "Embedding model installed (dim={}, hash={})",
            model.dim(),
            hex::encode(&model.model_hash()[..4])
        );
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(model);
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Drop the cached model. Intended for test isolation.
    pub fn reset(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashEmbedder;
    use liturgia_core::LiturgiaError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initializes_once() {
        let holder = ModelHolder::new();
        let calls = AtomicUsize::new(0);
        let init = || -> Result<Arc<dyn Embedder>> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HashEmbedder::new(32)?))
        };

        let a = holder.get_or_init(init).unwrap();
        let b = holder
            .get_or_init(|| -> Result<Arc<dyn Embedder>> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(HashEmbedder::new(64)?))
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.dim(), 32);
    }

    #[test]
    fn test_failed_init_leaves_holder_empty() {
        let holder = ModelHolder::new();
        let err = holder.get_or_init(|| Err(LiturgiaError::Embedding("no weights".into())));
        assert!(err.is_err());
        assert!(!holder.is_initialized());
    }

    #[test]
    fn test_set_replaces_and_skips_init() {
        let holder = ModelHolder::new();
        holder
            .get_or_init(|| Ok(Arc::new(HashEmbedder::new(8)?) as Arc<dyn Embedder>))
            .unwrap();

        holder.set(Arc::new(HashEmbedder::new(24).unwrap()));
        let model = holder
            .get_or_init(|| Err(LiturgiaError::Embedding("must not run".into())))
            .unwrap();
        assert_eq!(model.dim(), 24);
    }

    #[test]
    fn test_reset() {
        let holder = ModelHolder::new();
        holder
            .get_or_init(|| Ok(Arc::new(HashEmbedder::new(8)?) as Arc<dyn Embedder>))
            .unwrap();
        assert!(holder.is_initialized());
        holder.reset();
        assert!(!holder.is_initialized());
    }
}
