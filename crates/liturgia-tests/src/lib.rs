//! Shared helpers for the cross-crate tests in `tests/`.

use std::path::PathBuf;

use liturgia_core::Result;
use liturgia_embeddings::Embedder;

/// Path of a file under `fixtures/`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

/// Embedder with one axis per keyword, counting whole-word occurrences.
///
/// Makes expected cosines easy to compute by hand.
pub struct AxisEmbedder {
    axes: Vec<String>,
}

impl AxisEmbedder {
    pub fn new(axes: &[&str]) -> Self {
        Self {
            axes: axes.iter().map(|a| a.to_lowercase()).collect(),
        }
    }
}

impl Embedder for AxisEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.axes.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            let word = word.to_lowercase();
            if let Some(axis) = self.axes.iter().position(|a| *a == word) {
                vector[axis] += 1.0;
            }
        }
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.axes.len()
    }

    fn model_hash(&self) -> [u8; 32] {
        *blake3::hash(self.axes.join("\0").as_bytes()).as_bytes()
    }
}
