//! Lexical categories assigned to ligature matches.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// The coarse lexical role of the text surrounding a ligature match.
///
/// Exactly one category is assigned per classification. Configuration
/// documents refer to categories by name, case-insensitively, with `-` and
/// `_` treated alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementCategory {
    AttributeName,
    AttributeValue,
    BlockComment,
    CommentMarker,
    Constant,
    Identifier,
    Keyword,
    LineComment,
    Number,
    Operator,
    Other,
    Punctuation,
    Regexp,
    String,
    Tag,
    Text,
    Whitespace,
}

/// Error returned when a name does not denote an [`ElementCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown context name `{0}`")]
pub struct UnknownCategory(pub String);

impl ElementCategory {
    /// Every category, in declaration order.
    pub const ALL: [ElementCategory; 17] = [
        ElementCategory::AttributeName,
        ElementCategory::AttributeValue,
        ElementCategory::BlockComment,
        ElementCategory::CommentMarker,
        ElementCategory::Constant,
        ElementCategory::Identifier,
        ElementCategory::Keyword,
        ElementCategory::LineComment,
        ElementCategory::Number,
        ElementCategory::Operator,
        ElementCategory::Other,
        ElementCategory::Punctuation,
        ElementCategory::Regexp,
        ElementCategory::String,
        ElementCategory::Tag,
        ElementCategory::Text,
        ElementCategory::Whitespace,
    ];

    /// Returns the canonical upper-case name (e.g. `"LINE_COMMENT"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::AttributeName => "ATTRIBUTE_NAME",
            ElementCategory::AttributeValue => "ATTRIBUTE_VALUE",
            ElementCategory::BlockComment => "BLOCK_COMMENT",
            ElementCategory::CommentMarker => "COMMENT_MARKER",
            ElementCategory::Constant => "CONSTANT",
            ElementCategory::Identifier => "IDENTIFIER",
            ElementCategory::Keyword => "KEYWORD",
            ElementCategory::LineComment => "LINE_COMMENT",
            ElementCategory::Number => "NUMBER",
            ElementCategory::Operator => "OPERATOR",
            ElementCategory::Other => "OTHER",
            ElementCategory::Punctuation => "PUNCTUATION",
            ElementCategory::Regexp => "REGEXP",
            ElementCategory::String => "STRING",
            ElementCategory::Tag => "TAG",
            ElementCategory::Text => "TEXT",
            ElementCategory::Whitespace => "WHITESPACE",
        }
    }

    /// Returns the lower-case name used when writing configuration documents.
    pub fn config_name(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Resolves a configuration name to the categories it denotes.
    ///
    /// Besides the canonical names this accepts the alias `comment`, which
    /// stands for both comment bodies.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategory`] when the name matches no category.
    pub fn expand_name(name: &str) -> Result<Vec<ElementCategory>, UnknownCategory> {
        let canonical = canonical_name(name);
        if canonical == "COMMENT" {
            return Ok(vec![
                ElementCategory::BlockComment,
                ElementCategory::LineComment,
            ]);
        }
        canonical.parse().map(|category| vec![category])
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = canonical_name(s);
        ElementCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == canonical)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

fn canonical_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
