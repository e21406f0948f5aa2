//! Column alias profiles
//!
//! Exports from different tools name the same column differently. Each
//! source type has an ordered candidate list per semantic field; the first
//! candidate present in the row wins, even when its cell is empty.

use csvproc_common::SourceType;

use super::parser::Row;

/// Author used when no author column is present
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// The fields every normalized record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticField {
    Url,
    Headline,
    Author,
    Date,
}

impl SemanticField {
    /// Value used when none of the candidate columns exist
    pub fn default_value(self) -> &'static str {
        match self {
            SemanticField::Author => UNKNOWN_AUTHOR,
            SemanticField::Url | SemanticField::Headline | SemanticField::Date => "",
        }
    }
}

/// Ordered candidate headers for each semantic field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasProfile {
    pub url: &'static [&'static str],
    pub headline: &'static [&'static str],
    pub author: &'static [&'static str],
    pub date: &'static [&'static str],
}

pub const TWITTER_PROFILE: AliasProfile = AliasProfile {
    url: &["URL", "Link", "Post URL"],
    headline: &["Headline", "Title", "Post Text", "Content"],
    author: &["Author", "Screen Name", "Username"],
    date: &["Date", "Published", "Created"],
};

pub const NEWS_PROFILE: AliasProfile = AliasProfile {
    url: &["URL", "Link", "Article URL"],
    headline: &["Headline", "Title", "Article Title"],
    author: &["Author", "Publication", "Source"],
    date: &["Date", "Published", "Publication Date"],
};

impl AliasProfile {
    pub fn for_source(source_type: SourceType) -> &'static AliasProfile {
        match source_type {
            SourceType::Twitter => &TWITTER_PROFILE,
            SourceType::News => &NEWS_PROFILE,
        }
    }

    pub fn candidates(&self, field: SemanticField) -> &'static [&'static str] {
        match field {
            SemanticField::Url => self.url,
            SemanticField::Headline => self.headline,
            SemanticField::Author => self.author,
            SemanticField::Date => self.date,
        }
    }

    /// Cell of the first candidate column present in `row`
    pub fn lookup<'a>(&self, row: &Row<'a>, field: SemanticField) -> Option<&'a str> {
        self.candidates(field)
            .iter()
            .find_map(|header| row.get(header))
    }

    /// Like [`lookup`](Self::lookup), with the field default applied
    pub fn resolve_field<'a>(&self, row: &Row<'a>, field: SemanticField) -> &'a str {
        self.lookup(row, field).unwrap_or(field.default_value())
    }

    pub fn resolve<'a>(&self, row: &Row<'a>) -> ResolvedFields<'a> {
        ResolvedFields {
            url: self.resolve_field(row, SemanticField::Url),
            headline: self.resolve_field(row, SemanticField::Headline),
            author: self.resolve_field(row, SemanticField::Author),
            date: self.resolve_field(row, SemanticField::Date),
        }
    }
}

/// Field values resolved for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFields<'a> {
    pub url: &'a str,
    pub headline: &'a str,
    pub author: &'a str,
    pub date: &'a str,
}
