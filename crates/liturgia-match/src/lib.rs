//! Liturgia Match - Hymn recommendation
//!
//! Ranks the hymns of each moment against the day's readings and picks the
//! best one greedily, in service order. Selection is deterministic: the same
//! readings and corpus always produce the same recommendations.
//!
//! The readings are turned into one query vector: every non-empty section is
//! embedded on its own and the query is the normalised mean of those vectors,
//! so a long gospel does not drown out a short antiphon.

use std::collections::HashSet;

use liturgia_core::{
    l2_norm, Category, Embedding, Hymn, LiturgiaError, ReadingSet, Recommendation, Result, Season,
};
use liturgia_corpus::HymnCorpus;
use liturgia_embeddings::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Options for a matching run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Prefer hymns reserved for this season
    pub season: Option<Season>,
}

/// Result of a matching run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// One recommendation per filled moment, in service order
    pub recommendations: Vec<Recommendation>,
    /// Moments with no hymn in the catalog
    pub unfilled: Vec<Category>,
}

impl MatchReport {
    pub fn get(&self, category: Category) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.category == category)
    }
}

/// Greedy per-moment hymn matcher
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    options: MatchOptions,
}

impl Matcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Recommendations for every moment that has at least one hymn
    pub fn recommend(&self, readings: &ReadingSet, corpus: &HymnCorpus) -> Result<Vec<Recommendation>> {
        Ok(self.run(readings, corpus)?.recommendations)
    }

    pub fn run(&self, readings: &ReadingSet, corpus: &HymnCorpus) -> Result<MatchReport> {
        let query = self.query_embedding(readings, corpus.embedder().as_ref())?;
        let mut report = MatchReport::default();
        let mut used: HashSet<&str> = HashSet::new();

        for category in Category::ALL {
            let all = corpus.candidates(category);
            if all.is_empty() {
                warn!("{}", LiturgiaError::NoCandidateForCategory(category));
                report.unfilled.push(category);
                continue;
            }

            let fresh: Vec<&Hymn> = all
                .iter()
                .copied()
                .filter(|h| !used.contains(h.id.as_str()))
                .collect();
            let duplicate = fresh.is_empty();
            let candidates = self.narrow(category, if duplicate { all } else { fresh });

            let (hymn, score) = best_match(&query, &candidates, corpus)?;
            debug!(
                "{}: '{}' scored {:.4} among {} candidates{}",
                category,
                hymn.id,
                score,
                candidates.len(),
                if duplicate { " (reused)" } else { "" }
            );

            used.insert(hymn.id.as_str());
            report.recommendations.push(Recommendation {
                category,
                hymn_id: hymn.id.clone(),
                title: hymn.title.clone(),
                score,
                duplicate,
            });
        }

        info!(
            "Matched {} moments, {} unfilled",
            report.recommendations.len(),
            report.unfilled.len()
        );
        Ok(report)
    }

    /// Mean of the section embeddings, normalised.
    ///
    /// Readings without any text give the zero vector.
    pub fn query_embedding(&self, readings: &ReadingSet, embedder: &dyn Embedder) -> Result<Embedding> {
        let dim = embedder.dim();
        let sections = readings.sections();
        if sections.is_empty() {
            warn!("Readings for {} have no text, all hymns will score 0", readings.date);
            return Ok(Embedding::new(vec![0.0; dim], embedder.model_hash()));
        }

        let vectors = embedder.embed_batch(&sections)?;
        let mut mean = vec![0.0f32; dim];
        for vector in &vectors {
            if vector.len() != dim {
                return Err(LiturgiaError::Embedding(format!(
                    "model returned {} dimensions, expected {}",
                    vector.len(),
                    dim
                )));
            }
            for (acc, v) in mean.iter_mut().zip(vector) {
                *acc += v;
            }
        }

        let count = vectors.len() as f32;
        mean.iter_mut().for_each(|v| *v /= count);
        let norm = l2_norm(&mean);
        if norm > 0.0 {
            mean.iter_mut().for_each(|v| *v /= norm);
        }

        debug!("Query built from {} sections", sections.len());
        Ok(Embedding::new(mean, embedder.model_hash()))
    }

    /// Apply the optional season preference to the hymns still available
    /// for a moment: seasonal ones first, then untagged ones, then all.
    fn narrow<'c>(&self, category: Category, all: Vec<&'c Hymn>) -> Vec<&'c Hymn> {
        let Some(season) = self.options.season else {
            return all;
        };

        let seasonal: Vec<&Hymn> = all.iter().copied().filter(|h| h.is_for_season(season)).collect();
        if !seasonal.is_empty() {
            return seasonal;
        }

        let untagged: Vec<&Hymn> = all.iter().copied().filter(|h| !h.is_seasonal()).collect();
        if !untagged.is_empty() {
            return untagged;
        }

        debug!("{}: no hymn fits {}, using the whole pool", category, season.display_name());
        all
    }
}

/// Highest scoring hymn; equal scores go to the smallest id.
fn best_match<'c>(query: &Embedding, candidates: &[&'c Hymn], corpus: &HymnCorpus) -> Result<(&'c Hymn, f32)> {
    let mut best: Option<(&Hymn, f32)> = None;
    for &hymn in candidates {
        let score = query.similarity(corpus.embedding_of(&hymn.id)?);
        best = match best {
            Some((current, current_score))
                if current_score > score || (current_score == score && current.id <= hymn.id) =>
            {
                Some((current, current_score))
            }
            _ => Some((hymn, score)),
        };
    }
    best.ok_or_else(|| LiturgiaError::NotFound("empty candidate list".into()))
}
