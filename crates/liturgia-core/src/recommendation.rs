//! Hymn recommendations produced by the matcher

use serde::{Deserialize, Serialize};

use crate::hymn::Category;

/// The hymn chosen for one moment of the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub hymn_id: String,
    pub title: String,
    /// Cosine similarity with the day's readings, in [-1, 1]
    pub score: f32,
    /// Set when the hymn was already used for an earlier moment
    #[serde(default)]
    pub duplicate: bool,
}
