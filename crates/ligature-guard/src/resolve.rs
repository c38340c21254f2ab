//! Turns a classified match into a suppression decision.

use log::trace;
use serde::Serialize;

use ligature_guard_config::{ContextConfig, GlobalConfig, LanguageConfig};
use ligature_guard_core::ElementCategory;

use crate::{classify::classify, element::SyntaxTree};

/// What decided a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// The language allows every ligature.
    FullyEnabled,
    /// The language suppresses every ligature.
    FullyDisabled,
    /// A per-context list of the language.
    ContextOverride,
    /// The language's own list, the category being one of its contexts.
    LanguageContext,
    /// The category is not a context of the language; the match is left
    /// alone.
    OutsideContexts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub suppress: bool,
    /// Byte length of the one-character extension past the match, or 0.
    pub extra_span: usize,
    pub basis: Basis,
    /// Whether the deciding level asks for debug hints.
    pub debug: bool,
}

/// Decides matches against one configuration snapshot and one document.
#[derive(Debug)]
pub struct LigatureResolver<'a, T> {
    config: &'a GlobalConfig,
    tree: &'a T,
}

impl<'a, T: SyntaxTree> LigatureResolver<'a, T> {
    pub fn new(config: &'a GlobalConfig, tree: &'a T) -> Self {
        Self { config, tree }
    }

    /// Resolves the match of `matched` at `match_start`, already classified
    /// as `category` inside an element of `language_id`.
    pub fn resolve(
        &self,
        category: ElementCategory,
        language_id: &str,
        matched: &str,
        match_start: usize,
    ) -> Resolution {
        let language = self.config.language(language_id);
        let effective = language.effective(category);

        let (suppress, basis, debug) = match language.full_on_or_off() {
            Some(true) => (false, Basis::FullyEnabled, language.level().debug()),
            Some(false) => (true, Basis::FullyDisabled, language.level().debug()),
            None => match (language.context(category), effective) {
                (Some(context), _) => (context.suppresses(matched), Basis::ContextOverride, context.debug()),
                (None, Some(context)) => (context.suppresses(matched), Basis::LanguageContext, context.debug()),
                (None, None) => (false, Basis::OutsideContexts, language.level().debug()),
            },
        };
        let extra_span = self.extension(language, effective, category, matched, match_start);

        trace!(
            ligature = matched,
            offset = match_start,
            category:% = category,
            suppress = suppress,
            basis:? = basis,
            extra_span = extra_span;
            "Match resolved"
        );
        Resolution {
            suppress,
            extra_span,
            basis,
            debug,
        }
    }

    /// Decides whether the character after the match joins it.
    ///
    /// Some ligatures continue into a longer one the catalog does not list
    /// (`==` followed by `/`), so the character after the match is checked
    /// together with the last two characters of the match. It only joins
    /// when it lies in an element of the same category.
    fn extension(
        &self,
        language: &LanguageConfig,
        effective: Option<&ContextConfig>,
        category: ElementCategory,
        matched: &str,
        match_start: usize,
    ) -> usize {
        if language.full_on_or_off() == Some(false) {
            return 0;
        }

        let text = self.tree.text();
        let next = match_start + matched.len();
        if next >= text.len() || !text.is_char_boundary(next) {
            return 0;
        }
        let Some(window_start) = text[..next].char_indices().rev().nth(1).map(|(index, _)| index) else {
            return 0;
        };
        let Some(next_char) = text[next..].chars().next() else {
            return 0;
        };

        let Some(element) = self.tree.find_element_at(next) else {
            return 0;
        };
        if classify(&element, "", next) != category {
            return 0;
        }

        let matcher = match effective {
            Some(context) if language.full_on_or_off() != Some(true) => context.matcher(),
            _ => self.config.global_matcher(),
        };
        let window = &text[window_start..next + next_char.len_utf8()];
        let search_from = if window == "==/" {
            0
        } else {
            window.chars().next().map_or(0, char::len_utf8)
        };

        if matcher.find_at(window, search_from).is_some() {
            next_char.len_utf8()
        } else {
            0
        }
    }
}
