//! Common types used across the CSV processor

use serde::{Deserialize, Serialize};

/// Classification of an uploaded file.
///
/// Selects which alias profile is used to find columns and which label is
/// written into [`NormalizedRecord::source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Twitter,
    News,
}

impl SourceType {
    /// Label stored in the `source` field of every record of this type
    pub fn label(self) -> &'static str {
        match self {
            SourceType::Twitter => "Twitter/X",
            SourceType::News => "News",
        }
    }

    /// Lowercase tag, as used in routes and logs
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Twitter => "twitter",
            SourceType::News => "news",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform record produced for every retained CSV row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub url: String,
    pub headline: String,
    pub author: String,
    pub date: String,
    pub source: String,
}

impl NormalizedRecord {
    pub fn new(
        source_type: SourceType,
        url: impl Into<String>,
        headline: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            headline: headline.into(),
            author: author.into(),
            date: date.into(),
            source: source_type.label().to_string(),
        }
    }
}
