//! The resolved, compiled configuration.
//!
//! A [`GlobalConfig`] is built once per configuration change and never
//! mutated. Matchers are shared between levels through [`Arc`], so cloning a
//! snapshot or handing it to many scanning threads is cheap.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use ligature_guard_core::{
    CompiledMatcher, ElementCategory, catalog::default_catalog, language::normalize_language_id,
};

use crate::error::Diagnostic;

/// One ligature list, its polarity and its compiled matcher.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    ligatures: BTreeSet<String>,
    listed_are_enabled: bool,
    debug: bool,
    matcher: Arc<CompiledMatcher>,
}

impl ContextConfig {
    pub(crate) fn new(
        ligatures: BTreeSet<String>,
        listed_are_enabled: bool,
        debug: bool,
        matcher: Arc<CompiledMatcher>,
    ) -> Self {
        Self {
            ligatures,
            listed_are_enabled,
            debug,
            matcher,
        }
    }

    /// The listed ligatures.
    pub fn ligatures(&self) -> &BTreeSet<String> {
        &self.ligatures
    }

    /// Polarity of the list: `suppress = listed XOR NOT listed_are_enabled`.
    ///
    /// "Enabled" refers to suppression, as in the configuration format. With
    /// `true` a listed ligature is suppressed and an unlisted one is drawn;
    /// with `false`, the global default, a listed ligature is drawn and every
    /// other one is suppressed.
    pub fn listed_are_enabled(&self) -> bool {
        self.listed_are_enabled
    }

    /// Whether matches decided here carry a debug hint.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The matcher compiled from [`ligatures`](Self::ligatures).
    pub fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    /// Decides whether `text` is suppressed at this level.
    ///
    /// `suppress = listed XOR NOT listed_are_enabled`, where membership is an
    /// exact match against the compiled matcher so that pattern tokens such
    /// as `0xF` cover `0xA` too.
    pub fn suppresses(&self, text: &str) -> bool {
        self.matcher.matches_exactly(text) ^ !self.listed_are_enabled
    }

    fn to_json(&self, catalog: &BTreeSet<String>) -> Value {
        let polarity = if self.listed_are_enabled { "0" } else { "X" };
        let mut list = vec![polarity];
        list.extend(
            self.ligatures
                .iter()
                .filter(|token| catalog.contains(*token))
                .map(String::as_str),
        );
        Value::String(list.join(" "))
    }
}

/// A language level: contexts, an optional full override and per-context
/// ligature lists on top of its own [`ContextConfig`].
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    level: ContextConfig,
    contexts: BTreeSet<ElementCategory>,
    full_on_or_off: Option<bool>,
    inherits_from: Option<String>,
    by_context: BTreeMap<ElementCategory, ContextConfig>,
}

impl LanguageConfig {
    pub(crate) fn new(
        level: ContextConfig,
        contexts: BTreeSet<ElementCategory>,
        full_on_or_off: Option<bool>,
        inherits_from: Option<String>,
        by_context: BTreeMap<ElementCategory, ContextConfig>,
    ) -> Self {
        Self {
            level,
            contexts,
            full_on_or_off,
            inherits_from,
            by_context,
        }
    }

    pub fn level(&self) -> &ContextConfig {
        &self.level
    }

    /// Categories in which the level's own list applies.
    pub fn contexts(&self) -> &BTreeSet<ElementCategory> {
        &self.contexts
    }

    /// `Some(true)` allows every ligature, `Some(false)` suppresses every
    /// ligature, regardless of category.
    pub fn full_on_or_off(&self) -> Option<bool> {
        self.full_on_or_off
    }

    /// The (normalized) language this one was copied from, if any.
    pub fn inherits_from(&self) -> Option<&str> {
        self.inherits_from.as_deref()
    }

    pub fn context(&self, category: ElementCategory) -> Option<&ContextConfig> {
        self.by_context.get(&category)
    }

    pub fn by_context(&self) -> impl Iterator<Item = (ElementCategory, &ContextConfig)> {
        self.by_context.iter().map(|(category, context)| (*category, context))
    }

    /// The list that decides matches in `category`.
    ///
    /// A per-context override wins; otherwise the level's own list applies
    /// when the category is one of [`contexts`](Self::contexts). `None` means
    /// matches in this category are not candidates.
    pub fn effective(&self, category: ElementCategory) -> Option<&ContextConfig> {
        self.by_context
            .get(&category)
            .or_else(|| self.contexts.contains(&category).then_some(&self.level))
    }

    fn to_json(&self, catalog: &BTreeSet<String>, with_debug: bool) -> Map<String, Value> {
        let mut map = Map::new();

        let mut contexts = vec!["0".to_string()];
        contexts.extend(self.contexts.iter().map(ElementCategory::config_name));
        map.insert("contexts".to_string(), Value::String(contexts.join(" ")));
        if with_debug {
            map.insert("debug".to_string(), Value::Bool(self.level.debug));
        }
        map.insert("ligatures".to_string(), self.level.to_json(catalog));

        if !self.by_context.is_empty() {
            let by_context = self
                .by_context
                .iter()
                .map(|(category, context)| {
                    let entry = json!({
                        "debug": context.debug,
                        "ligatures": context.to_json(catalog),
                    });
                    (category.config_name(), entry)
                })
                .collect();
            map.insert("ligaturesByContext".to_string(), Value::Object(by_context));
        }

        map
    }
}

/// A fully resolved configuration snapshot.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    level: LanguageConfig,
    disregarded: BTreeSet<String>,
    languages: IndexMap<String, LanguageConfig>,
    catalog: BTreeSet<String>,
    global_matcher: Arc<CompiledMatcher>,
    warnings: Vec<Diagnostic>,
}

impl GlobalConfig {
    pub(crate) fn new(
        level: LanguageConfig,
        disregarded: BTreeSet<String>,
        languages: IndexMap<String, LanguageConfig>,
        catalog: BTreeSet<String>,
        global_matcher: Arc<CompiledMatcher>,
        warnings: Vec<Diagnostic>,
    ) -> Self {
        Self {
            level,
            disregarded,
            languages,
            catalog,
            global_matcher,
            warnings,
        }
    }

    /// The configuration of an empty settings document.
    ///
    /// Used as the last resort when no configuration text can be parsed.
    pub fn baseline() -> Self {
        crate::elaborate::elaborate(crate::parser::Document::baseline())
    }

    /// The global level, which languages without an entry fall back to.
    pub fn level(&self) -> &LanguageConfig {
        &self.level
    }

    /// Looks up a language by host id, falling back to the global level.
    pub fn language(&self, id: &str) -> &LanguageConfig {
        self.languages
            .get(&normalize_language_id(id))
            .unwrap_or(&self.level)
    }

    /// Languages with an entry, in document order.
    pub fn languages(&self) -> impl Iterator<Item = (&str, &LanguageConfig)> {
        self.languages
            .iter()
            .map(|(id, language)| (id.as_str(), language))
    }

    pub fn disregarded(&self) -> &BTreeSet<String> {
        &self.disregarded
    }

    /// Every ligature that can be matched: the built-in catalog minus the
    /// disregarded ones plus every ligature named by some list.
    pub fn catalog(&self) -> &BTreeSet<String> {
        &self.catalog
    }

    /// Warnings reported while parsing the document this snapshot was
    /// built from.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// The matcher a document scan runs over the raw text.
    pub fn global_matcher(&self) -> &CompiledMatcher {
        &self.global_matcher
    }

    /// Re-serializes this configuration as strict JSON.
    ///
    /// Inheritance is flattened and every list is written with an explicit
    /// polarity, so parsing the result gives the same catalog and the same
    /// decision for every catalog ligature in every context.
    pub fn to_json(&self) -> Value {
        let mut root = self.level.to_json(&self.catalog, false);

        let builtin = default_catalog();
        let disregarded: Vec<&str> = builtin
            .difference(&self.catalog)
            .map(String::as_str)
            .collect();
        root.insert("disregarded".to_string(), Value::String(disregarded.join(" ")));

        // custom ligatures only survive a round trip if some list names them
        let listed = self.listed_tokens();
        let unlisted: Vec<&str> = self
            .catalog
            .iter()
            .filter(|token| !builtin.contains(*token) && !listed.contains(token.as_str()))
            .map(String::as_str)
            .collect();
        if !unlisted.is_empty() {
            let level = &self.level.level;
            let remove = if level.listed_are_enabled { "-" } else { "+" };
            let mut list = level.to_json(&self.catalog).as_str().unwrap_or_default().to_string();
            list.push(' ');
            list.push_str(remove);
            for token in unlisted {
                list.push(' ');
                list.push_str(token);
            }
            root.insert("ligatures".to_string(), Value::String(list));
        }

        if !self.languages.is_empty() {
            let languages = self
                .languages
                .iter()
                .map(|(id, language)| {
                    let entry = match language.full_on_or_off {
                        Some(full) => Value::Bool(full),
                        None => Value::Object(language.to_json(&self.catalog, true)),
                    };
                    (id.clone(), entry)
                })
                .collect();
            root.insert("languages".to_string(), Value::Object(languages));
        }

        Value::Object(root)
    }

    fn listed_tokens(&self) -> BTreeSet<&str> {
        let written = self
            .languages
            .values()
            .filter(|language| language.full_on_or_off.is_none());
        let levels = std::iter::once(&self.level).chain(written);
        levels
            .flat_map(|language| {
                std::iter::once(&language.level).chain(language.by_context.values())
            })
            .flat_map(|context| context.ligatures.iter().map(String::as_str))
            .filter(|token| self.catalog.contains(*token))
            .collect()
    }
}
