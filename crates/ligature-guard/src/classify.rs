//! Assigns an [`ElementCategory`] to a ligature match from the tree element
//! that contains it.
//!
//! Host tags are free-form (`"LINE_COMMENT"`, `"XML_ATTRIBUTE_VALUE_TOKEN"`,
//! `"CSS_IDENT"`), so they are normalized into lowercase words first and
//! rules look for whole-word phrases. When the element itself says nothing
//! useful, the classifier climbs to its parent, at most [`DEFAULT_BUDGET`]
//! times.

use log::trace;

use ligature_guard_core::{ElementCategory, language::is_markup_language};

use crate::element::SyntaxElement;

/// How many parents classification may climb before giving up.
pub const DEFAULT_BUDGET: usize = 2;

/// Words that disqualify a tag from being operator-like even when the
/// matched text is all symbols.
const NON_OPERATOR_WORDS: &[&str] = &[
    "attribute",
    "class",
    "identifier",
    "literal",
    "name",
    "space",
    "string",
    "text",
    "value",
];

const BLOCK_COMMENT_PHRASES: &[&str] = &["block comment", "c style comment", "doc comment"];

#[derive(Debug, Clone, Copy)]
enum Verdict {
    Category(ElementCategory),
    /// Whitespace only decides the category if nothing later does.
    Whitespace,
}

struct TagRule {
    phrases: &'static [&'static str],
    verdict: Verdict,
}

/// Checked in order; the first rule with a matching phrase wins.
const TAG_RULES: &[TagRule] = &[
    TagRule {
        phrases: &["string", "escape sequence"],
        verdict: Verdict::Category(ElementCategory::String),
    },
    TagRule {
        phrases: &["regexp"],
        verdict: Verdict::Category(ElementCategory::Regexp),
    },
    TagRule {
        phrases: &["keyword"],
        verdict: Verdict::Category(ElementCategory::Keyword),
    },
    TagRule {
        phrases: &["identifier", "ident", "class name", "css class", "css ident"],
        verdict: Verdict::Category(ElementCategory::Identifier),
    },
    TagRule {
        phrases: &["whitespace", "white space"],
        verdict: Verdict::Whitespace,
    },
    TagRule {
        phrases: &["float", "integer", "numeric", "number"],
        verdict: Verdict::Category(ElementCategory::Number),
    },
    TagRule {
        phrases: &["constant"],
        verdict: Verdict::Category(ElementCategory::Constant),
    },
    TagRule {
        phrases: &["text", "data characters", "fence content"],
        verdict: Verdict::Category(ElementCategory::Text),
    },
    TagRule {
        phrases: &[
            "tag start",
            "tag end",
            "comma",
            "lpar",
            "rpar",
            "lbrace",
            "rbrace",
            "lbracket",
            "rbracket",
            "semicolon",
        ],
        verdict: Verdict::Category(ElementCategory::Punctuation),
    },
];

/// A host tag split into lowercase words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTag {
    words: Vec<String>,
}

impl NormalizedTag {
    pub fn new(tag: &str) -> Self {
        let words = tag
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// Whether the words of `phrase` occur consecutively in this tag.
    pub fn has(&self, phrase: &str) -> bool {
        let wanted: Vec<&str> = phrase.split(' ').collect();
        self.words
            .windows(wanted.len())
            .any(|window| window.iter().zip(&wanted).all(|(word, want)| word == want))
    }

    pub fn has_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.has(phrase))
    }

    /// Whether the whole tag is exactly `phrase`.
    pub fn is(&self, phrase: &str) -> bool {
        self.words.len() == phrase.split(' ').count() && self.has(phrase)
    }
}

/// Classifies a match with the default parent budget.
///
/// `matched` is the ligature text (empty when probing the character after a
/// match) and `match_start` its byte offset in the document.
pub fn classify<E: SyntaxElement>(element: &E, matched: &str, match_start: usize) -> ElementCategory {
    classify_with_budget(element, matched, match_start, DEFAULT_BUDGET)
}

/// Classifies a match, climbing at most `budget` parents.
pub fn classify_with_budget<E: SyntaxElement>(
    element: &E,
    matched: &str,
    match_start: usize,
    budget: usize,
) -> ElementCategory {
    let mut current = element.clone();
    let mut remaining = budget;

    loop {
        if let Some(category) = classify_one(&current, matched, match_start) {
            trace!(tag = current.kind_tag(), category:% = category; "Match classified");
            return category;
        }
        match current.parent() {
            Some(parent) if remaining > 0 => {
                current = parent;
                remaining -= 1;
            }
            _ => return ElementCategory::Other,
        }
    }
}

fn classify_one<E: SyntaxElement>(element: &E, matched: &str, match_start: usize) -> Option<ElementCategory> {
    let tag = NormalizedTag::new(element.kind_tag());

    let mut whitespace = false;
    match TAG_RULES.iter().find(|rule| tag.has_any(rule.phrases)) {
        Some(TagRule {
            verdict: Verdict::Category(category),
            ..
        }) => return Some(*category),
        Some(TagRule {
            verdict: Verdict::Whitespace,
            ..
        }) => whitespace = true,
        None => {
            if is_quote(matched) || (is_markup_language(element.language()) && is_markup_delimiter(matched)) {
                return Some(ElementCategory::Punctuation);
            }
        }
    }

    let operator_like = is_operator_like(&tag, matched);
    let comment_like = tag.has("comment") || tag.has("shebang");
    let block_comment = comment_like && tag.has_any(BLOCK_COMMENT_PHRASES);

    if !whitespace && operator_like && comment_like {
        let start = element.start_offset();
        let at_close = element.end_offset().checked_sub(matched.len()) == Some(match_start);
        if start == match_start || (block_comment && at_close) {
            return Some(ElementCategory::CommentMarker);
        }
    }
    if block_comment {
        return Some(ElementCategory::BlockComment);
    }
    if comment_like {
        return Some(ElementCategory::LineComment);
    }
    if operator_like {
        return Some(ElementCategory::Operator);
    }

    if let Some(category) = element
        .parent()
        .and_then(|parent| parent_role(&NormalizedTag::new(parent.kind_tag()), matched))
    {
        return Some(category);
    }

    whitespace.then_some(ElementCategory::Whitespace)
}

/// Markup structure that decides the category of otherwise neutral text.
fn parent_role(parent: &NormalizedTag, matched: &str) -> Option<ElementCategory> {
    if parent.is("xml doctype") {
        let category = if matched.starts_with("<!") {
            ElementCategory::Tag
        } else if matched.starts_with(['\'', '"']) {
            ElementCategory::AttributeValue
        } else {
            ElementCategory::AttributeName
        };
        return Some(category);
    }
    if parent.is("xml attribute") {
        return Some(ElementCategory::AttributeName);
    }
    if parent.is("xml attribute value") {
        return Some(ElementCategory::AttributeValue);
    }
    if parent.is("html tag") || parent.is("xml tag") {
        return Some(ElementCategory::Tag);
    }
    if parent.is("xml text") {
        return Some(ElementCategory::Text);
    }
    None
}

fn is_quote(matched: &str) -> bool {
    matches!(matched, "'" | "\"" | "`")
}

fn is_markup_delimiter(matched: &str) -> bool {
    (1..=2).contains(&matched.len()) && matched.chars().all(|c| matches!(c, '<' | '/' | '>'))
}

fn is_operator_like(tag: &NormalizedTag, matched: &str) -> bool {
    !matched.is_empty()
        && matched.chars().count() < 8
        && matched.chars().all(|c| c.is_ascii_punctuation())
        && !tag.has_any(NON_OPERATOR_WORDS)
}
