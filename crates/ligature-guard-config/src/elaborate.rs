//! Compiles a resolved document into a [`GlobalConfig`].

use std::collections::{BTreeMap, BTreeSet};

use log::info;

use ligature_guard_core::{MatcherCache, catalog::default_catalog};

use crate::{
    draft::{ContextDraft, LanguageDraft},
    model::{ContextConfig, GlobalConfig, LanguageConfig},
    parser::Document,
};

pub(crate) fn elaborate(document: Document) -> GlobalConfig {
    let Document {
        global,
        disregarded,
        languages,
        mentioned,
        warnings,
    } = document;

    let mut catalog: BTreeSet<String> = default_catalog()
        .difference(&disregarded)
        .cloned()
        .collect();
    catalog.extend(mentioned);

    let known: BTreeSet<String> = catalog.union(&disregarded).cloned().collect();
    let mut builder = Builder {
        known: &known,
        cache: MatcherCache::new(),
    };

    let level = builder.language(global);
    let languages = languages
        .into_iter()
        .map(|(id, draft)| (id, builder.language(draft)))
        .collect::<indexmap::IndexMap<_, _>>();
    let global_matcher = builder.cache.get_or_compile(&catalog, &disregarded);

    info!(
        catalog = catalog.len(),
        languages = languages.len(),
        matchers = builder.cache.len(),
        cache_hits = builder.cache.hits(),
        warnings = warnings.len();
        "Ligature configuration built"
    );

    GlobalConfig::new(level, disregarded, languages, catalog, global_matcher, warnings)
}

struct Builder<'a> {
    known: &'a BTreeSet<String>,
    cache: MatcherCache,
}

impl Builder<'_> {
    fn context(&mut self, draft: ContextDraft) -> ContextConfig {
        let omitted: BTreeSet<String> = self.known.difference(&draft.ligatures).cloned().collect();
        let matcher = self.cache.get_or_compile(&draft.ligatures, &omitted);
        ContextConfig::new(draft.ligatures, draft.listed_are_enabled, draft.debug, matcher)
    }

    fn language(&mut self, draft: LanguageDraft) -> LanguageConfig {
        let LanguageDraft {
            level,
            contexts,
            full_on_or_off,
            inherits_from,
            by_context,
        } = draft;

        let by_context: BTreeMap<_, _> = by_context
            .into_iter()
            .map(|(category, context)| (category, self.context(context)))
            .collect();
        LanguageConfig::new(self.context(level), contexts, full_on_or_off, inherits_from, by_context)
    }
}
