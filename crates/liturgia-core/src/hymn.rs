//! Hymn catalog records and the moments of the service they are sung at

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::calendar::Season;

/// A moment of the service that takes one hymn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Entrance,
    Offertory,
    Communion,
    Closing,
}

impl Category {
    /// All moments, in the order they occur during the service
    pub const ALL: [Category; 4] = [
        Category::Entrance,
        Category::Offertory,
        Category::Communion,
        Category::Closing,
    ];

    /// Parse a moment name in English or Italian
    pub fn from_tag(tag: &str) -> Option<Self> {
        let category = match tag.trim().to_lowercase().as_str() {
            "entrance" | "ingresso" => Category::Entrance,
            "offertory" | "offertorio" => Category::Offertory,
            "communion" | "comunione" => Category::Communion,
            "closing" | "finale" | "congedo" => Category::Closing,
            _ => return None,
        };
        Some(category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entrance => "entrance",
            Category::Offertory => "offertory",
            Category::Communion => "communion",
            Category::Closing => "closing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hymn from the catalog
///
/// The embedding is not stored here: the corpus that loaded the hymn owns
/// and caches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    /// Stable identifier (explicit in the catalog or slug of the title)
    pub id: String,

    /// Title as printed on the sheet
    pub title: String,

    /// Moments this hymn is suitable for
    pub categories: BTreeSet<Category>,

    /// Seasons the hymn is reserved for; empty means any season
    pub seasons: BTreeSet<Season>,

    /// Plain text of the hymn
    pub text: String,
}

impl Hymn {
    pub fn fits(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Whether the hymn is reserved for some seasons only
    pub fn is_seasonal(&self) -> bool {
        !self.seasons.is_empty()
    }

    pub fn is_for_season(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}
