//! Mutable per-level drafts built while walking a configuration document.
//!
//! Drafts hold plain sets. They are copied when a language inherits from
//! another level and compiled into matchers only once the whole document has
//! been resolved.

use std::collections::{BTreeMap, BTreeSet};

use ligature_guard_core::{ElementCategory, catalog::DEFAULT_LISTED};

use crate::error::{Diagnostic, ErrorCode, Result};

/// One ligature list with its polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContextDraft {
    pub ligatures: BTreeSet<String>,
    pub listed_are_enabled: bool,
    pub debug: bool,
}

impl ContextDraft {
    pub fn global_default() -> Self {
        Self {
            ligatures: DEFAULT_LISTED.iter().map(|token| token.to_string()).collect(),
            listed_are_enabled: false,
            debug: false,
        }
    }

    /// Applies a ligature list to this draft.
    ///
    /// The running mode starts as `+`. Every token longer than one character
    /// is a ligature and is recorded in `mentioned`.
    pub fn apply_ligatures(
        &mut self,
        tokens: &[&str],
        path: &str,
        mentioned: &mut BTreeSet<String>,
    ) -> Result<()> {
        let mut remove = !self.listed_are_enabled;

        for token in tokens {
            match single_char(token) {
                Some('+') => remove = !self.listed_are_enabled,
                Some('-') => remove = self.listed_are_enabled,
                Some('0' | 'O') => {
                    self.ligatures.clear();
                    self.listed_are_enabled = true;
                    remove = false;
                }
                Some('X') => {
                    self.ligatures.clear();
                    self.listed_are_enabled = false;
                    remove = false;
                }
                Some(_) => {
                    return Err(invalid_control(token, path, "`+`, `-`, `0`, `O` or `X`"));
                }
                None => {
                    mentioned.insert(token.to_string());
                    if remove {
                        self.ligatures.remove(*token);
                    } else {
                        self.ligatures.insert(token.to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

/// A language level (or the global level) under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LanguageDraft {
    pub level: ContextDraft,
    pub contexts: BTreeSet<ElementCategory>,
    pub full_on_or_off: Option<bool>,
    pub inherits_from: Option<String>,
    pub by_context: BTreeMap<ElementCategory, ContextDraft>,
}

impl LanguageDraft {
    pub fn global_default() -> Self {
        Self {
            level: ContextDraft::global_default(),
            contexts: [
                ElementCategory::Operator,
                ElementCategory::Punctuation,
                ElementCategory::CommentMarker,
            ]
            .into_iter()
            .collect(),
            full_on_or_off: None,
            inherits_from: None,
            by_context: BTreeMap::new(),
        }
    }

    /// Starts a language from its parent. `fullOnOrOff` is not inherited.
    pub fn inherit(parent: &LanguageDraft, inherits_from: Option<String>) -> Self {
        Self {
            full_on_or_off: None,
            inherits_from,
            ..parent.clone()
        }
    }

    /// The draft a `ligaturesByContext` entry for `category` starts from.
    pub fn context_start(&self, category: ElementCategory) -> ContextDraft {
        self.by_context
            .get(&category)
            .cloned()
            .unwrap_or_else(|| self.level.clone())
    }
}

/// Applies a context list to a set of categories.
///
/// Tokens are `+`, `-`, `0`/`O`, and context names optionally prefixed with
/// `+` or `-`. A prefix switches the running mode like the bare token does.
pub(crate) fn apply_contexts(
    contexts: &mut BTreeSet<ElementCategory>,
    tokens: &[&str],
    path: &str,
) -> Result<()> {
    let mut enable = true;

    for token in tokens {
        match single_char(token) {
            Some('+') => enable = true,
            Some('-') => enable = false,
            Some('0' | 'O') => {
                contexts.clear();
                enable = true;
            }
            Some(_) => return Err(invalid_control(token, path, "`+`, `-`, `0` or `O`")),
            None => {
                let name = if let Some(name) = token.strip_prefix('+') {
                    enable = true;
                    name
                } else if let Some(name) = token.strip_prefix('-') {
                    enable = false;
                    name
                } else {
                    *token
                };

                let categories = ElementCategory::expand_name(name)
                    .map_err(|err| invalid_context(&err.to_string(), path))?;
                for category in categories {
                    if enable {
                        contexts.insert(category);
                    } else {
                        contexts.remove(&category);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Creates the diagnostic for an unknown context name.
pub(crate) fn invalid_context(message: &str, path: &str) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E103)
        .with_path(path)
        .with_help(format!(
            "context names are {} or `comment`",
            ElementCategory::ALL
                .iter()
                .map(|category| format!("`{}`", category.config_name()))
                .collect::<Vec<_>>()
                .join(", ")
        ))
}

fn invalid_control(token: &str, path: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(format!("invalid control token `{token}`"))
        .with_code(ErrorCode::E102)
        .with_path(path)
        .with_help(format!("one-character tokens must be {expected}"))
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(draft: &mut ContextDraft, list: &str) -> BTreeSet<String> {
        let tokens: Vec<&str> = list.split_whitespace().collect();
        let mut mentioned = BTreeSet::new();
        draft
            .apply_ligatures(&tokens, "ligatures", &mut mentioned)
            .expect("list is valid");
        mentioned
    }

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn test_plus_removes_from_unlisted_polarity() {
        let mut draft = ContextDraft::global_default();
        let mentioned = apply(&mut draft, "+ 0xF ->");

        assert!(!draft.ligatures.contains("0xF"));
        assert!(!draft.ligatures.contains("->"));
        assert!(!draft.listed_are_enabled);
        assert_eq!(mentioned, set(&["0xF", "->"]));
    }

    #[test]
    fn test_leading_tokens_apply_as_plus() {
        let mut implicit = ContextDraft::global_default();
        let mut explicit = ContextDraft::global_default();
        apply(&mut implicit, "-> == - ==");
        apply(&mut explicit, "+ -> == - ==");

        assert_eq!(implicit.ligatures, explicit.ligatures);
        assert!(!implicit.ligatures.contains("->"));
        assert!(implicit.ligatures.contains("=="));
    }

    #[test]
    fn test_minus_adds_to_unlisted_polarity() {
        let mut draft = ContextDraft::global_default();
        apply(&mut draft, "- -> ==");

        assert!(draft.ligatures.contains("->"));
        assert!(draft.ligatures.contains("=="));
    }

    #[test]
    fn test_zero_switches_polarity() {
        let mut draft = ContextDraft::global_default();
        apply(&mut draft, "0 -> == - ==");

        assert!(draft.listed_are_enabled);
        assert_eq!(draft.ligatures, set(&["->"]));

        apply(&mut draft, "O !=");
        assert_eq!(draft.ligatures, set(&["!="]));
    }

    #[test]
    fn test_x_clears_to_unlisted_polarity() {
        let mut draft = ContextDraft::global_default();
        apply(&mut draft, "0 -> X <= >=");

        assert!(!draft.listed_are_enabled);
        assert_eq!(draft.ligatures, set(&["<=", ">="]));
    }

    #[test]
    fn test_invalid_control_token() {
        let mut draft = ContextDraft::global_default();
        let err = draft
            .apply_ligatures(&["+", "*"], "languages.kotlin.ligatures", &mut BTreeSet::new())
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E102));
        assert_eq!(err.path(), Some("languages.kotlin.ligatures"));
    }

    #[test]
    fn test_apply_contexts() {
        let mut contexts = LanguageDraft::global_default().contexts;
        apply_contexts(&mut contexts, &["-operator", "string", "+comment"], "contexts").unwrap();

        assert!(!contexts.contains(&ElementCategory::Operator));
        assert!(!contexts.contains(&ElementCategory::String));
        assert!(contexts.contains(&ElementCategory::LineComment));
        assert!(contexts.contains(&ElementCategory::BlockComment));
        assert!(contexts.contains(&ElementCategory::Punctuation));
    }

    #[test]
    fn test_apply_contexts_reset() {
        let mut contexts = LanguageDraft::global_default().contexts;
        apply_contexts(&mut contexts, &["0", "Number", "attribute-value"], "contexts").unwrap();

        let expected: BTreeSet<_> = [ElementCategory::Number, ElementCategory::AttributeValue]
            .into_iter()
            .collect();
        assert_eq!(contexts, expected);
    }

    #[test]
    fn test_apply_contexts_errors() {
        let mut contexts = BTreeSet::new();

        let err = apply_contexts(&mut contexts, &["x"], "contexts").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));

        let err = apply_contexts(&mut contexts, &["+bogus"], "contexts").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E103));
        assert_eq!(err.message(), "unknown context name `bogus`");
    }

    #[test]
    fn test_inherit_drops_full_on_or_off() {
        let mut parent = LanguageDraft::global_default();
        parent.full_on_or_off = Some(true);
        parent.level.debug = true;

        let child = LanguageDraft::inherit(&parent, Some("kotlin".to_string()));
        assert_eq!(child.full_on_or_off, None);
        assert!(child.level.debug);
        assert_eq!(child.inherits_from.as_deref(), Some("kotlin"));
    }
}
