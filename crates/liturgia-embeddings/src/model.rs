//! Signed feature-hashing embedder
//!
//! Every content word and every character trigram of a content word is
//! hashed with BLAKE3 into one of `dim` buckets, with a sign taken from the
//! hash so that collisions cancel out on average. Trigrams let inflected forms
//! ("amore", "amare", "amato") share part of their signal. The result is
//! L2-normalised, so cosine similarity reduces to a dot product.

use liturgia_core::{l2_norm, LiturgiaError, Result};

use crate::tokenizer::Tokenizer;
use crate::{Embedder, ModelManifest};

/// Default embedding dimension
pub const DEFAULT_DIM: usize = 384;

/// Weight of a whole-word feature
const WORD_WEIGHT: f32 = 1.0;

/// Weight of a single character-trigram feature
const TRIGRAM_WEIGHT: f32 = 0.35;

/// Model identifier, part of the manifest hash
pub const MODEL_ID: &str = "liturgia/hash-embedder";
pub const MODEL_VERSION: &str = "1";

/// Deterministic, dependency-free text embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    tokenizer: Tokenizer,
    manifest: ModelManifest,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(LiturgiaError::Embedding("embedding dimension must be positive".into()));
        }
        Ok(Self {
            dim,
            tokenizer: Tokenizer::new(),
            manifest: ModelManifest::new(MODEL_ID, MODEL_VERSION, dim),
        })
    }

    fn add_feature(&self, vector: &mut [f32], kind: &str, feature: &str, weight: f32) {
        let mut hasher = blake3::Hasher::new();
        hasher.update(kind.as_bytes());
        hasher.update(&[0]);
        hasher.update(feature.as_bytes());
        let hash = hasher.finalize();
        let bytes = hash.as_bytes();

        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dim as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };

        vector[bucket] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            tokenizer: Tokenizer::new(),
            manifest: ModelManifest::new(MODEL_ID, MODEL_VERSION, DEFAULT_DIM),
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];

        for word in self.tokenizer.words(text) {
            self.add_feature(&mut vector, "w", &word, WORD_WEIGHT);
            for trigram in self.tokenizer.trigrams(&word) {
                self.add_feature(&mut vector, "t", &trigram, TRIGRAM_WEIGHT);
            }
        }

        let norm = l2_norm(&vector);
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn model_hash(&self) -> [u8; 32] {
        self.manifest.manifest_hash
    }
}
