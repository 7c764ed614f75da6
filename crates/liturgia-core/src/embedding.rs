//! Embedding vectors and cosine similarity

use serde::{Deserialize, Serialize};

/// An embedding vector derived from a text
///
/// Tracks the model used for provenance and compatibility checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// The embedding vector
    pub vector: Vec<f32>,

    /// Hash identifying the model that produced this embedding
    pub model_hash: [u8; 32],

    /// L2 norm of the vector (for cosine similarity)
    pub norm: f32,
}

impl Embedding {
    /// Create a new embedding, computing its L2 norm
    pub fn new(vector: Vec<f32>, model_hash: [u8; 32]) -> Self {
        let norm = l2_norm(&vector);
        Self {
            vector,
            model_hash,
            norm,
        }
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Compute cosine similarity with another vector
    pub fn cosine_similarity(&self, other: &[f32]) -> f32 {
        if self.vector.len() != other.len() {
            return 0.0;
        }

        let other_norm = l2_norm(other);
        if self.norm == 0.0 || other_norm == 0.0 {
            return 0.0;
        }

        let dot: f32 = self.vector.iter().zip(other.iter()).map(|(a, b)| a * b).sum();
        (dot / (self.norm * other_norm)).clamp(-1.0, 1.0)
    }

    /// Cosine similarity between two embeddings of the same model
    pub fn similarity(&self, other: &Embedding) -> f32 {
        if self.model_hash != other.model_hash {
            return 0.0;
        }
        self.cosine_similarity(&other.vector)
    }
}

impl PartialEq for Embedding {
    fn eq(&self, other: &Self) -> bool {
        self.model_hash == other.model_hash && self.vector == other.vector
    }
}

/// Compute the L2 (Euclidean) norm of a vector
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Cosine similarity of two raw vectors; 0.0 when either is zero or lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_creation() {
        let emb = Embedding::new(vec![3.0, 4.0], [0u8; 32]);
        assert_eq!(emb.dim(), 2);
        assert!((emb.norm - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity() {
        let emb = Embedding::new(vec![1.0, 0.0, 0.0], [0u8; 32]);

        // Same direction = 1.0
        assert!((emb.cosine_similarity(&[2.0, 0.0, 0.0]) - 1.0).abs() < 1e-6);

        // Orthogonal = 0.0
        assert!(emb.cosine_similarity(&[0.0, 1.0, 0.0]).abs() < 1e-6);

        // Opposite = -1.0
        assert!((emb.cosine_similarity(&[-1.0, 0.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_and_mismatched_vectors() {
        let zero = Embedding::new(vec![0.0, 0.0], [0u8; 32]);
        assert_eq!(zero.norm, 0.0);
        assert_eq!(zero.cosine_similarity(&[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_models_do_not_mix() {
        let a = Embedding::new(vec![1.0, 1.0], [1u8; 32]);
        let b = Embedding::new(vec![1.0, 1.0], [2u8; 32]);
        assert_eq!(a.similarity(&b), 0.0);
        assert!((a.similarity(&a) - 1.0).abs() < 1e-6);
    }
}
