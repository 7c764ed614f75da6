//! Transformer sentence embedder
//!
//! Runs a BERT-family sentence-transformer on the CPU with candle, for
//! instance `sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2`.
//! The model directory holds the three files published on the Hugging Face
//! hub: `config.json`, `tokenizer.json` and `model.safetensors`.
//!
//! Token states are mean-pooled over the attention mask and L2-normalised,
//! which is how sentence-transformers pools these models.

use std::fs::File;
use std::path::Path;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use liturgia_core::{l2_norm, LiturgiaError, Result};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::{Embedder, ModelManifest};

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Longer inputs are truncated
pub const MAX_SEQ_LEN: usize = 256;

/// The part of `config.json` read directly
#[derive(Debug, Deserialize)]
struct Dimensions {
    hidden_size: usize,
}

/// Sentence-transformer running on candle
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    manifest: ModelManifest,
}

impl BertEmbedder {
    /// Load a model directory
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        let tokenizer_path = dir.join(TOKENIZER_FILE);
        let weights_path = dir.join(WEIGHTS_FILE);
        for path in [&config_path, &tokenizer_path, &weights_path] {
            if !path.is_file() {
                return Err(model_error(format!("{} not found", path.display())));
            }
        }

        let config_json = std::fs::read(&config_path)?;
        let config: BertConfig = serde_json::from_slice(&config_json)
            .map_err(|e| model_error(format!("invalid {}: {}", config_path.display(), e)))?;
        let dim = serde_json::from_slice::<Dimensions>(&config_json)
            .map_err(|e| model_error(format!("invalid {}: {}", config_path.display(), e)))?
            .hidden_size;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            model_error(format!("tokenizer load failed at {}: {}", tokenizer_path.display(), e))
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| model_error(format!("cannot set truncation: {}", e)))?;
        tokenizer.with_padding(None);

        let device = Device::Cpu;
        // SAFETY: the weights file is only read while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DTYPE, &device) }
            .map_err(|e| model_error(format!("failed to load safetensors: {}", e)))?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| model_error(format!("failed to build model: {}", e)))?;

        let content_hash = hash_files(&[&config_path, &tokenizer_path, &weights_path])?;
        let model_id = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        let manifest = ModelManifest::new(&model_id, &content_hash, dim);

        info!(
            "Loaded sentence model '{}' from {} (dim={})",
            model_id,
            dir.display(),
            dim
        );
        Ok(Self {
            model,
            tokenizer,
            device,
            dim,
            manifest,
        })
    }

    fn forward(&self, ids: &[u32], mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;

        // (1, tokens, hidden)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let weights = attention_mask.to_dtype(DTYPE)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&weights)?.sum(1)?;
        let counted = weights.sum(1)?;
        summed.broadcast_div(&counted)?.squeeze(0)?.to_vec1::<f32>()
    }
}

impl Embedder for BertEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| LiturgiaError::Embedding(format!("tokenization failed: {}", e)))?;
        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; self.dim]);
        }

        let mut vector = self
            .forward(encoding.get_ids(), encoding.get_attention_mask())
            .map_err(|e| LiturgiaError::Embedding(format!("inference failed: {}", e)))?;
        debug!("Embedded {} tokens", encoding.get_ids().len());

        let norm = l2_norm(&vector);
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
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

/// BLAKE3 over the model files, in order, as hex
fn hash_files(paths: &[&Path]) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    for path in paths {
        hasher.update_reader(File::open(path)?)?;
    }
    Ok(hasher.finalize().to_hex().to_string())
}

fn model_error(message: String) -> LiturgiaError {
    LiturgiaError::Embedding(format!("sentence model: {}", message))
}
