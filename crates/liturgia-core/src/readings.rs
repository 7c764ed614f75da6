//! The day's readings as supplied by a readings gateway

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where an antiphon is said
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiphonKind {
    Entrance,
    Communion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antiphon {
    pub kind: AntiphonKind,
    pub text: String,
}

/// Readings and antiphons for one celebration
///
/// Texts are plain, with line breaks preserved as `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSet {
    pub date: NaiveDate,
    pub first_reading: String,
    pub psalm: String,
    pub second_reading: Option<String>,
    pub gospel_acclamation: Option<String>,
    pub gospel: String,
    /// Antiphons in the order they occur in the service
    pub antiphons: Vec<Antiphon>,
}

impl ReadingSet {
    /// Texts that describe the day, in liturgical order, skipping empty ones.
    ///
    /// The gospel acclamation is left out: it repeats a verse of the gospel.
    pub fn sections(&self) -> Vec<&str> {
        let mut sections = vec![self.first_reading.as_str(), self.psalm.as_str()];
        if let Some(second) = &self.second_reading {
            sections.push(second.as_str());
        }
        sections.push(self.gospel.as_str());
        sections.extend(self.antiphons.iter().map(|a| a.text.as_str()));

        sections.into_iter().filter(|s| !s.trim().is_empty()).collect()
    }

    /// First antiphon of the given kind
    pub fn antiphon(&self, kind: AntiphonKind) -> Option<&str> {
        self.antiphons
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.text.as_str())
    }
}
