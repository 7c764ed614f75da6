//! Liturgia Core - Data models, errors and the liturgical calendar
//!
//! This crate defines the fundamental types shared by every Liturgia component:
//! - Liturgical date resolution (season, Sunday ordinal, reading cycles)
//! - Readings, hymns and recommendations
//! - Embedding vectors and cosine similarity
//! - The unified error type

pub mod calendar;
mod embedding;
mod error;
mod hymn;
mod readings;
mod recommendation;
pub mod text;

pub use calendar::{Celebration, Cycle, LiturgicalDate, Season, WeekdayCycle};
pub use embedding::{cosine_similarity, l2_norm, Embedding};
pub use error::{LiturgiaError, Result};
pub use hymn::{Category, Hymn};
pub use readings::{Antiphon, AntiphonKind, ReadingSet};
pub use recommendation::Recommendation;

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(input: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| LiturgiaError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date ({})", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-31").unwrap();
        assert_eq!(date.to_string(), "2024-03-31");
        assert!(parse_date(" 2025-04-20 ").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("31/03/2024"), Err(LiturgiaError::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(LiturgiaError::InvalidDate(_))));
        assert!(matches!(parse_date(""), Err(LiturgiaError::InvalidDate(_))));
    }
}
