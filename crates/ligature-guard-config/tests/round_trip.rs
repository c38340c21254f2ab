//! Property tests for re-serializing resolved configurations.

use proptest::prelude::*;
use serde_json::{Map, Value};

use ligature_guard_config::{GlobalConfig, LanguageConfig, parse_json};
use ligature_guard_core::ElementCategory;

const LIGATURE_TOKENS: &[&str] = &["+", "-", "0", "X", "->", "==", "!=", "<=", "0xF", "ff", "===", "<<<<"];
const CONTEXT_TOKENS: &[&str] = &["+", "-", "0", "string", "+number", "-operator", "comment", "line_comment"];
const LANGUAGE_IDS: &[&str] = &["kotlin", "rust", "Shell Script", "go"];
const CONTEXT_NAMES: &[&str] = &["number", "string", "comment", "operator"];
const DISREGARDED: &[&str] = &["ff", "fi", "->", "===", "<<<<"];

// ===================
// Strategies
// ===================

fn list_strategy(pool: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(pool), 0..6).prop_map(|tokens| tokens.join(" "))
}

/// A `ligaturesByContext` object with up to two entries.
fn by_context_strategy() -> impl Strategy<Value = Value> {
    proptest::collection::vec(
        (
            proptest::sample::select(CONTEXT_NAMES),
            list_strategy(LIGATURE_TOKENS),
            any::<bool>(),
        ),
        0..3,
    )
    .prop_map(|entries| {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(name, list, debug)| {
                let entry = serde_json::json!({"debug": debug, "ligatures": list});
                (name.to_string(), entry)
            })
            .collect();
        Value::Object(map)
    })
}

/// A language entry: a full override, or an object that may inherit from a
/// language earlier in the list.
fn language_strategy() -> impl Strategy<Value = (Option<bool>, Option<usize>, String, String, bool, Value)> {
    (
        proptest::option::weighted(0.2, any::<bool>()),
        proptest::option::of(0..LANGUAGE_IDS.len()),
        list_strategy(CONTEXT_TOKENS),
        list_strategy(LIGATURE_TOKENS),
        any::<bool>(),
        by_context_strategy(),
    )
}

fn config_strategy() -> impl Strategy<Value = Value> {
    (
        list_strategy(CONTEXT_TOKENS),
        list_strategy(LIGATURE_TOKENS),
        proptest::collection::vec(proptest::sample::select(DISREGARDED), 0..3),
        by_context_strategy(),
        proptest::collection::vec(language_strategy(), 0..LANGUAGE_IDS.len()),
    )
        .prop_map(|(contexts, ligatures, disregarded, by_context, languages)| {
            let mut entries = Map::new();
            for (index, (full, inherit, contexts, ligatures, debug, by_context)) in
                languages.into_iter().enumerate()
            {
                let entry = match full {
                    Some(full) => Value::Bool(full),
                    None => {
                        let mut map = Map::new();
                        map.insert("contexts".into(), Value::String(contexts));
                        map.insert("ligatures".into(), Value::String(ligatures));
                        map.insert("debug".into(), Value::Bool(debug));
                        map.insert("ligaturesByContext".into(), by_context);
                        if let Some(parent) = inherit.filter(|parent| *parent < index) {
                            map.insert("inherit".into(), Value::String(LANGUAGE_IDS[parent].into()));
                        }
                        Value::Object(map)
                    }
                };
                entries.insert(LANGUAGE_IDS[index].to_string(), entry);
            }

            serde_json::json!({
                "contexts": contexts,
                "ligatures": ligatures,
                "disregarded": disregarded.join(" "),
                "ligaturesByContext": by_context,
                "languages": entries,
            })
        })
}

// ===================
// Property Test Functions
// ===================

#[derive(Debug, PartialEq)]
enum Decision {
    Full(bool),
    NotCandidate,
    Decided { suppress: bool, debug: bool },
}

fn decide(language: &LanguageConfig, category: ElementCategory, text: &str) -> Decision {
    if let Some(full) = language.full_on_or_off() {
        return Decision::Full(full);
    }
    match language.effective(category) {
        Some(context) => Decision::Decided {
            suppress: context.suppresses(text),
            debug: context.debug(),
        },
        None => Decision::NotCandidate,
    }
}

fn check_round_trip_keeps_decisions(document: &Value) -> Result<(), TestCaseError> {
    let first = parse_json(&document.to_string())
        .map_err(|err| TestCaseError::fail(format!("generated document rejected: {err}")))?;
    let written = first.to_json().to_string();
    let second: GlobalConfig = parse_json(&written)
        .map_err(|err| TestCaseError::fail(format!("re-serialized document rejected: {err}\n{written}")))?;

    prop_assert_eq!(first.catalog(), second.catalog());

    let ids: Vec<&str> = first.languages().map(|(id, _)| id).chain(["cobol"]).collect();
    for id in ids {
        for category in ElementCategory::ALL {
            for token in first.catalog().iter().filter(|token| LIGATURE_TOKENS.contains(&token.as_str())) {
                prop_assert_eq!(
                    decide(first.language(id), category, token),
                    decide(second.language(id), category, token),
                    "language `{}`, category {}, ligature `{}`",
                    id,
                    category,
                    token
                );
            }
        }
    }
    Ok(())
}

fn check_to_json_is_stable(document: &Value) -> Result<(), TestCaseError> {
    let first = parse_json(&document.to_string())
        .map_err(|err| TestCaseError::fail(format!("generated document rejected: {err}")))?;
    let once = first.to_json();
    let second = parse_json(&once.to_string())
        .map_err(|err| TestCaseError::fail(format!("re-serialized document rejected: {err}")))?;

    prop_assert_eq!(once, second.to_json());
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn round_trip_keeps_decisions(document in config_strategy()) {
        check_round_trip_keeps_decisions(&document)?;
    }

    #[test]
    fn to_json_is_stable(document in config_strategy()) {
        check_to_json_is_stable(&document)?;
    }
}
