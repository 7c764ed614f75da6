//! Liturgia Corpus - The hymn catalog
//!
//! Holds the fixed catalog as an ordered list of [`Hymn`] records with an
//! id index and a per-moment index. Each hymn's embedding is computed on
//! first access and cached for the lifetime of the corpus; once loaded, a
//! corpus is never mutated and can be shared across threads behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use liturgia_core::{Category, Embedding, Hymn, LiturgiaError, Result};
use liturgia_embeddings::Embedder;
use tracing::{debug, info};

mod cache;
pub mod catalog;

pub use cache::CorpusCache;

/// The loaded hymn catalog and its embedding cache
pub struct HymnCorpus {
    hymns: Vec<Hymn>,
    by_id: HashMap<String, usize>,
    by_category: BTreeMap<Category, Vec<usize>>,
    embeddings: Vec<OnceLock<Embedding>>,
    embedder: Arc<dyn Embedder>,
    source: Option<PathBuf>,
}

impl HymnCorpus {
    /// Load a catalog file
    pub fn load(path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LiturgiaError::CorpusLoad(format!("cannot read catalog {}: {}", path.display(), e))
        })?;

        let mut corpus = Self::from_json(&json, embedder)?;
        corpus.source = Some(path.to_path_buf());
        info!("Loaded {} hymns from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let hymns = catalog::parse_catalog(json)?;
        Self::from_hymns(hymns, embedder)
    }

    /// Build a corpus from already parsed hymns
    pub fn from_hymns(hymns: Vec<Hymn>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if hymns.is_empty() {
            return Err(LiturgiaError::CorpusLoad("catalog contains no usable hymn".into()));
        }

        let mut by_id = HashMap::with_capacity(hymns.len());
        let mut by_category: BTreeMap<Category, Vec<usize>> = BTreeMap::new();

        for (idx, hymn) in hymns.iter().enumerate() {
            if by_id.insert(hymn.id.clone(), idx).is_some() {
                return Err(LiturgiaError::CorpusLoad(format!("duplicate hymn id '{}'", hymn.id)));
            }
            for category in &hymn.categories {
                by_category.entry(*category).or_default().push(idx);
            }
        }

        let embeddings = (0..hymns.len()).map(|_| OnceLock::new()).collect();

        Ok(Self {
            hymns,
            by_id,
            by_category,
            embeddings,
            embedder,
            source: None,
        })
    }

    pub fn len(&self) -> usize {
        self.hymns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hymns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Hymn> {
        self.by_id.get(id).map(|&idx| &self.hymns[idx])
    }

    /// Hymns suitable for a moment, in catalog order
    pub fn candidates(&self, category: Category) -> Vec<&Hymn> {
        self.by_category
            .get(&category)
            .map(|indexes| indexes.iter().map(|&idx| &self.hymns[idx]).collect())
            .unwrap_or_default()
    }

    /// Embedding of a hymn, computed on first access
    pub fn embedding_of(&self, id: &str) -> Result<&Embedding> {
        let idx = *self
            .by_id
            .get(id)
            .ok_or_else(|| LiturgiaError::NotFound(format!("hymn '{}'", id)))?;
        self.embedding_at(idx)
    }

    fn embedding_at(&self, idx: usize) -> Result<&Embedding> {
        let cell = &self.embeddings[idx];
        if let Some(embedding) = cell.get() {
            return Ok(embedding);
        }

        let hymn = &self.hymns[idx];
        debug!("Embedding hymn '{}'", hymn.id);
        let vector = self.embedder.embed(&embedding_text(hymn))?;
        let embedding = Embedding::new(vector, self.embedder.model_hash());
        Ok(cell.get_or_init(|| embedding))
    }

    /// Compute every embedding now instead of on first access
    pub fn warm_up(&self) -> Result<()> {
        for idx in 0..self.hymns.len() {
            self.embedding_at(idx)?;
        }
        debug!("Warmed up {} hymn embeddings", self.hymns.len());
        Ok(())
    }

    /// Number of embeddings computed so far
    pub fn embedded_count(&self) -> usize {
        self.embeddings.iter().filter(|c| c.get().is_some()).count()
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Catalog file this corpus was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Text fed to the embedder: title, then body.
fn embedding_text(hymn: &Hymn) -> String {
    if hymn.text.is_empty() {
        hymn.title.clone()
    } else {
        format!("{}\n{}", hymn.title, hymn.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liturgia_embeddings::HashEmbedder;

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new(64).unwrap())
    }

    const CATALOG: &str = r#"{"hymns": [
        {"id": "b-offer", "title": "Benedetto sei tu", "categories": ["offertory"], "text": "pane e vino"},
        {"id": "a-entry", "title": "Alleluia cantate", "categories": ["entrance", "closing"], "seasons": ["easter"], "text": "Cristo è risorto"},
        {"id": "c-comm", "title": "Pane del cielo", "categories": "communion", "text": "sei tu Signore"}
    ]}"#;

    #[test]
    fn test_indexes() {
        let corpus = HymnCorpus::from_json(CATALOG, embedder()).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get("c-comm").unwrap().title, "Pane del cielo");
        assert!(corpus.get("missing").is_none());

        let closing: Vec<&str> = corpus.candidates(Category::Closing).iter().map(|h| h.id.as_str()).collect();
        assert_eq!(closing, vec!["a-entry"]);
    }

    #[test]
    fn test_embeddings_are_lazy_and_cached() {
        let corpus = HymnCorpus::from_json(CATALOG, embedder()).unwrap();
        assert_eq!(corpus.embedded_count(), 0);

        let first = corpus.embedding_of("b-offer").unwrap() as *const Embedding;
        let second = corpus.embedding_of("b-offer").unwrap() as *const Embedding;
        assert_eq!(first, second);
        assert_eq!(corpus.embedded_count(), 1);

        corpus.warm_up().unwrap();
        assert_eq!(corpus.embedded_count(), 3);
    }

    #[test]
    fn test_unknown_hymn_embedding() {
        let corpus = HymnCorpus::from_json(CATALOG, embedder()).unwrap();
        assert!(matches!(corpus.embedding_of("nope"), Err(LiturgiaError::NotFound(_))));
    }

    #[test]
    fn test_explicit_duplicate_ids_rejected() {
        let json = r#"{"hymns": [
            {"id": "servo", "title": "Servo per amore", "categories": ["offertory"]},
            {"id": "servo", "title": "Servo per amore (bis)", "categories": ["closing"]}
        ]}"#;
        assert!(matches!(HymnCorpus::from_json(json, embedder()), Err(LiturgiaError::CorpusLoad(_))));
    }

    #[test]
    fn test_legacy_catalog_with_repeats_and_gaps_loads() {
        let json = r#"{"canti": [
            {"titolo": "Servo per amore", "tipologia": "offertorio"},
            {"titolo": "Senza tipologia", "tipologia": null},
            {"titolo": "Servo per amore", "tipologia": "finale"}
        ]}"#;
        let corpus = HymnCorpus::from_json(json, embedder()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.candidates(Category::Closing)[0].id, "servo-per-amore");
        assert_eq!(corpus.candidates(Category::Offertory)[0].id, "servo-per-amore");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let json = r#"{"hymns": []}"#;
        assert!(matches!(HymnCorpus::from_json(json, embedder()), Err(LiturgiaError::CorpusLoad(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = HymnCorpus::load(Path::new("/nonexistent/canti.json"), embedder());
        assert!(matches!(result, Err(LiturgiaError::CorpusLoad(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canti.json");
        std::fs::write(&path, CATALOG).unwrap();

        let corpus = HymnCorpus::load(&path, embedder()).unwrap();
        assert_eq!(corpus.source(), Some(path.as_path()));
        assert_eq!(corpus.len(), 3);
    }
}
