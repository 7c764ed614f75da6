//! Liturgia Embeddings - Deterministic text embeddings
//!
//! Provides the [`Embedder`] seam used by the hymn corpus and the matcher,
//! the built-in [`HashEmbedder`], the transformer-based [`BertEmbedder`],
//! and [`ModelHolder`] for initializing the process-wide model at most once.
//!
//! All embedders must be deterministic: the same text always maps to the
//! same vector, which the matcher relies on for reproducible rankings.

use liturgia_core::Result;

mod bert;
mod holder;
mod model;
mod tokenizer;

pub use bert::{BertEmbedder, CONFIG_FILE, MAX_SEQ_LEN, TOKENIZER_FILE, WEIGHTS_FILE};
pub use holder::ModelHolder;
pub use model::{HashEmbedder, DEFAULT_DIM, MODEL_ID, MODEL_VERSION};
pub use tokenizer::Tokenizer;

// ============================================================================
// Embedder
// ============================================================================

/// A text embedding model
pub trait Embedder: Send + Sync {
    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Dimension of the produced vectors
    fn dim(&self) -> usize;

    /// Hash identifying the model, stored with every embedding
    fn model_hash(&self) -> [u8; 32];
}

// ============================================================================
// Model Manifest
// ============================================================================

/// Model manifest for provenance tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelManifest {
    pub model_id: String,
    pub version: String,
    pub dim: usize,
    pub manifest_hash: [u8; 32],
}

impl ModelManifest {
    pub fn new(model_id: &str, version: &str, dim: usize) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(version.as_bytes());
        hasher.update(&(dim as u64).to_le_bytes());
        let manifest_hash = *hasher.finalize().as_bytes();

        Self {
            model_id: model_id.to_string(),
            version: version.to_string(),
            dim,
            manifest_hash,
        }
    }

    /// Get manifest hash as hex string
    pub fn manifest_hash_hex(&self) -> String {
        hex::encode(self.manifest_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_hash_hex() {
        let manifest = ModelManifest::new(MODEL_ID, MODEL_VERSION, DEFAULT_DIM);
        let hex = manifest.manifest_hash_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(manifest, ModelManifest::new(MODEL_ID, MODEL_VERSION, DEFAULT_DIM));
    }

    #[test]
    fn test_default_batch_preserves_order() {
        let model = HashEmbedder::new(64).unwrap();
        let batch = model.embed_batch(&["pace", "gioia"]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], model.embed("pace").unwrap());
        assert_eq!(batch[1], model.embed("gioia").unwrap());
    }
}
