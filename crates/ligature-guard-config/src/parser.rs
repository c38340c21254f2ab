//! Walks a JSON configuration value into per-level drafts.
//!
//! The global level is read first, including its `ligaturesByContext`, so
//! that languages inherit the global overrides. Languages are then resolved
//! as a fixed point: each sweep builds every entry whose parent is already
//! built, until a sweep makes no progress. Forward references and backward
//! references therefore resolve the same way, and cycles end in an
//! `E200` diagnostic instead of a loop.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::{Map, Value};

use ligature_guard_core::{ElementCategory, catalog::default_catalog, language::normalize_language_id};

use crate::{
    draft::{ContextDraft, LanguageDraft, apply_contexts, invalid_context},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Result},
};

const GLOBAL_KEYS: &[&str] = &["contexts", "disregarded", "languages", "ligatures", "ligaturesByContext"];
const LANGUAGE_KEYS: &[&str] = &["contexts", "debug", "inherit", "ligatures", "ligaturesByContext"];
const CONTEXT_KEYS: &[&str] = &["debug", "ligatures"];

/// A fully resolved document, ready to be compiled.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub global: LanguageDraft,
    pub disregarded: BTreeSet<String>,
    pub languages: IndexMap<String, LanguageDraft>,
    /// Every ligature token named in any ligature list.
    pub mentioned: BTreeSet<String>,
    pub warnings: Vec<Diagnostic>,
}

impl Document {
    /// The document an empty configuration object resolves to.
    pub fn baseline() -> Self {
        Self {
            global: LanguageDraft::global_default(),
            disregarded: BTreeSet::new(),
            languages: IndexMap::new(),
            mentioned: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }
}

/// Resolves a parsed JSON value into a [`Document`].
pub(crate) fn parse_document(root: &Value) -> std::result::Result<Document, ParseError> {
    let Value::Object(root) = root else {
        return Err(Diagnostic::error(format!(
            "configuration must be an object, found {}",
            kind(root)
        ))
        .with_code(ErrorCode::E001)
        .with_path("")
        .into());
    };

    let mut parser = Parser::new();
    let global = parser.global(root);
    let languages = match root.get("languages") {
        Some(value) => parser.languages(value, &global),
        None => IndexMap::new(),
    };

    let Parser {
        collector,
        disregarded,
        mentioned,
        ..
    } = parser;
    let warnings = collector.finish()?;

    Ok(Document {
        global,
        disregarded,
        languages,
        mentioned,
        warnings,
    })
}

/// A language entry waiting for its parent.
struct Pending<'v> {
    id: String,
    path: String,
    inherit: Option<String>,
    body: &'v Value,
}

struct Parser {
    collector: DiagnosticCollector,
    builtin: BTreeSet<String>,
    disregarded: BTreeSet<String>,
    mentioned: BTreeSet<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            collector: DiagnosticCollector::new(),
            builtin: default_catalog(),
            disregarded: BTreeSet::new(),
            mentioned: BTreeSet::new(),
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(diagnostic) = result {
            self.collector.emit(diagnostic);
        }
    }

    // ========================================================================
    // Global level
    // ========================================================================

    fn global(&mut self, root: &Map<String, Value>) -> LanguageDraft {
        let mut draft = LanguageDraft::global_default();

        for (key, value) in root {
            let result = match key.as_str() {
                "contexts" => tokens(value, key).and_then(|tokens| apply_contexts(&mut draft.contexts, &tokens, key)),
                "ligatures" => self.ligatures(&mut draft.level, value, key),
                "disregarded" => tokens(value, key).map(|tokens| {
                    self.disregarded
                        .extend(tokens.into_iter().map(str::to_string));
                }),
                "languages" | "ligaturesByContext" => Ok(()),
                "debug" | "inherit" => Err(misplaced(key, key, "inside a language entry")),
                _ => Err(unknown_field(key, key, GLOBAL_KEYS)),
            };
            self.report(result);
        }

        if let Some(value) = root.get("ligaturesByContext") {
            let result = self.by_context(&mut draft, value, "ligaturesByContext");
            self.report(result);
        }

        trace!(contexts:? = draft.contexts, ligatures = draft.level.ligatures.len(); "Global level read");
        draft
    }

    // ========================================================================
    // Languages
    // ========================================================================

    fn languages(&mut self, value: &Value, global: &LanguageDraft) -> IndexMap<String, LanguageDraft> {
        let Value::Object(entries) = value else {
            self.collector
                .emit(type_mismatch(value, "languages", "an object keyed by language id"));
            return IndexMap::new();
        };

        let mut pending: IndexMap<String, Pending<'_>> = IndexMap::new();
        for (key, body) in entries {
            let path = child("languages", key);
            let inherit = match body {
                Value::Object(map) => match inherit_target(map, &path) {
                    Ok(inherit) => inherit,
                    Err(diagnostic) => {
                        self.collector.emit(diagnostic);
                        continue;
                    }
                },
                _ => None,
            };
            let id = normalize_language_id(key);
            pending.insert(
                id.clone(),
                Pending {
                    id,
                    path,
                    inherit,
                    body,
                },
            );
        }

        let order: Vec<String> = pending.keys().cloned().collect();
        let mut resolved: HashMap<String, LanguageDraft> = HashMap::new();
        let mut failed: HashSet<String> = HashSet::new();
        let mut waiting: Vec<Pending<'_>> = pending.into_values().collect();
        let mut sweeps = 0;

        loop {
            sweeps += 1;
            let before = waiting.len();
            let mut next = Vec::new();

            for entry in waiting {
                let parent = match entry.inherit.as_deref() {
                    None => Some(global.clone()),
                    Some(target) if failed.contains(target) => {
                        failed.insert(entry.id);
                        continue;
                    }
                    Some(target) => resolved.get(target).cloned(),
                };
                let Some(parent) = parent else {
                    next.push(entry);
                    continue;
                };

                match self.language(entry.body, &parent, entry.inherit.clone(), &entry.path) {
                    Ok(draft) => {
                        debug!(language = entry.id.as_str(), inherits:? = entry.inherit; "Resolved language");
                        resolved.insert(entry.id, draft);
                    }
                    Err(diagnostic) => {
                        self.collector.emit(diagnostic);
                        failed.insert(entry.id);
                    }
                }
            }

            waiting = next;
            if waiting.is_empty() || waiting.len() == before {
                break;
            }
        }

        debug!(sweeps = sweeps, resolved = resolved.len(), failed = failed.len(); "Language resolution finished");

        if !waiting.is_empty() {
            let names = waiting
                .iter()
                .map(|entry| {
                    format!(
                        "`{}` (inherits `{}`)",
                        entry.id,
                        entry.inherit.as_deref().unwrap_or_default()
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            self.collector.emit(
                Diagnostic::error(format!("unresolved inheritance: {names}"))
                    .with_code(ErrorCode::E200)
                    .with_path("languages")
                    .with_help(
                        "every `inherit` must name a language of this document, and languages must not inherit from each other in a cycle",
                    ),
            );
        }

        order
            .into_iter()
            .filter_map(|id| resolved.remove(&id).map(|draft| (id, draft)))
            .collect()
    }

    fn language(
        &mut self,
        body: &Value,
        parent: &LanguageDraft,
        inherits_from: Option<String>,
        path: &str,
    ) -> Result<LanguageDraft> {
        let mut draft = LanguageDraft::inherit(parent, inherits_from);

        let map = match body {
            Value::Bool(full) => {
                draft.full_on_or_off = Some(*full);
                return Ok(draft);
            }
            Value::Object(map) => map,
            other => return Err(type_mismatch(other, path, "a boolean or an object")),
        };

        for (key, value) in map {
            let key_path = child(path, key);
            match key.as_str() {
                "contexts" => apply_contexts(&mut draft.contexts, &tokens(value, &key_path)?, &key_path)?,
                "ligatures" => self.ligatures(&mut draft.level, value, &key_path)?,
                "debug" => draft.level.debug = boolean(value, &key_path)?,
                "inherit" | "ligaturesByContext" => {}
                "disregarded" | "languages" => return Err(misplaced(key, &key_path, "at the global level")),
                _ => return Err(unknown_field(key, &key_path, LANGUAGE_KEYS)),
            }
        }

        if let Some(value) = map.get("ligaturesByContext") {
            self.by_context(&mut draft, value, &child(path, "ligaturesByContext"))?;
        }

        Ok(draft)
    }

    // ========================================================================
    // Ligature lists
    // ========================================================================

    fn by_context(&mut self, draft: &mut LanguageDraft, value: &Value, path: &str) -> Result<()> {
        let Value::Object(entries) = value else {
            return Err(type_mismatch(value, path, "an object keyed by context name"));
        };

        for (name, entry) in entries {
            let entry_path = child(path, name);
            let categories = ElementCategory::expand_name(name)
                .map_err(|err| invalid_context(&err.to_string(), &entry_path))?;

            for category in categories {
                let mut context = draft.context_start(category);
                self.context(&mut context, entry, &entry_path)?;
                draft.by_context.insert(category, context);
            }
        }

        Ok(())
    }

    fn context(&mut self, context: &mut ContextDraft, value: &Value, path: &str) -> Result<()> {
        let Value::Object(map) = value else {
            return self.ligatures(context, value, path);
        };

        for (key, value) in map {
            let key_path = child(path, key);
            match key.as_str() {
                "debug" => context.debug = boolean(value, &key_path)?,
                "ligatures" => self.ligatures(context, value, &key_path)?,
                _ => return Err(unknown_field(key, &key_path, CONTEXT_KEYS)),
            }
        }

        Ok(())
    }

    fn ligatures(&mut self, context: &mut ContextDraft, value: &Value, path: &str) -> Result<()> {
        let tokens = tokens(value, path)?;
        let before = self.mentioned.clone();
        context.apply_ligatures(&tokens, path, &mut self.mentioned)?;

        for token in self.mentioned.difference(&before) {
            if !self.builtin.contains(token) {
                debug!(ligature = token.as_str(), path = path; "Custom ligature added to catalog");
                self.collector.emit(
                    Diagnostic::warning(format!("`{token}` is not a built-in ligature"))
                        .with_path(path)
                        .with_help("it is added to the catalog as a custom ligature"),
                );
            }
        }

        Ok(())
    }
}

fn inherit_target(map: &Map<String, Value>, path: &str) -> Result<Option<String>> {
    match map.get("inherit") {
        None => Ok(None),
        Some(Value::String(target)) => Ok(Some(normalize_language_id(target))),
        Some(other) => Err(type_mismatch(other, &child(path, "inherit"), "a language id string")),
    }
}

/// Splits a string or an array of strings into whitespace-separated tokens.
fn tokens<'v>(value: &'v Value, path: &str) -> Result<Vec<&'v str>> {
    match value {
        Value::String(text) => Ok(text.split_whitespace().collect()),
        Value::Array(items) => {
            let mut tokens = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(text) => tokens.extend(text.split_whitespace()),
                    other => return Err(type_mismatch(other, &format!("{path}[{index}]"), "a string")),
                }
            }
            Ok(tokens)
        }
        other => Err(type_mismatch(other, path, "a string or an array of strings")),
    }
}

fn boolean(value: &Value, path: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_mismatch(value, path, "a boolean"))
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn type_mismatch(value: &Value, path: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(format!("expected {expected}, found {}", kind(value)))
        .with_code(ErrorCode::E101)
        .with_path(path)
}

fn unknown_field(key: &str, path: &str, expected: &[&str]) -> Diagnostic {
    Diagnostic::error(format!("unknown field `{key}`"))
        .with_code(ErrorCode::E100)
        .with_path(path)
        .with_help(format!(
            "expected one of {}",
            expected
                .iter()
                .map(|key| format!("`{key}`"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
}

fn misplaced(key: &str, path: &str, allowed: &str) -> Diagnostic {
    Diagnostic::error(format!("field `{key}` is not allowed here"))
        .with_code(ErrorCode::E100)
        .with_path(path)
        .with_help(format!("`{key}` is only allowed {allowed}"))
}
