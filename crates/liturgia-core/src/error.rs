//! Error types for Liturgia operations

use serde::Serialize;
use thiserror::Error;

use crate::hymn::Category;

/// Unified error type for Liturgia operations
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum LiturgiaError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Readings retrieval failed: {0}")]
    Retrieval(String),

    #[error("Hymn catalog could not be loaded: {0}")]
    CorpusLoad(String),

    #[error("No candidate hymn for the {0} moment")]
    NoCandidateForCategory(Category),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    #[serde(serialize_with = "serialize_io_error")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LiturgiaError {
    fn from(e: serde_json::Error) -> Self {
        LiturgiaError::Serialization(e.to_string())
    }
}

fn serialize_io_error<S>(error: &std::io::Error, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&error.to_string())
}

/// Result type alias using LiturgiaError
pub type Result<T> = std::result::Result<T, LiturgiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_tagged() {
        let err = LiturgiaError::Retrieval("HTTP 503".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Retrieval");
        assert_eq!(json["message"], "HTTP 503");
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = LiturgiaError::NoCandidateForCategory(Category::Offertory);
        assert_eq!(err.to_string(), "No candidate hymn for the offertory moment");
    }
}
