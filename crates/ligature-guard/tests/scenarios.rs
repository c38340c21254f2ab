use proptest::prelude::*;

use ligature_guard::{
    Basis, CancelToken, CursorMode, ElementCategory, GuardError, LigatureGuard, LigatureSpan,
    ScanOptions, ScanSession, tree::TokenTree,
};

fn guard(source: &str) -> LigatureGuard {
    LigatureGuard::from_source(source).unwrap_or_else(|err| panic!("Failed to parse config: {err}"))
}

fn scan(guard: &LigatureGuard, text: &str, language: &str) -> Vec<LigatureSpan> {
    let tree = TokenTree::parse(text, language);
    guard
        .scan(&tree, ScanOptions::default(), &CancelToken::new())
        .into_spans()
        .expect("scan was not cancelled")
}

fn find<'a>(spans: &'a [LigatureSpan], ligature: &str) -> &'a LigatureSpan {
    spans
        .iter()
        .find(|span| span.ligature == ligature)
        .unwrap_or_else(|| panic!("no `{ligature}` span in {spans:?}"))
}

#[test]
fn test_operator_is_suppressed_by_default() {
    let spans = scan(&guard("{}"), "a != b", "kotlin");

    let span = find(&spans, "!=");
    assert!(span.suppressed);
    assert_eq!(span.category, ElementCategory::Operator);
    assert_eq!((span.offset, span.length), (2, 2));
}

#[test]
fn test_comment_body_is_not_a_candidate() {
    let spans = scan(&guard("{}"), "// a -> b", "kotlin");

    let marker = find(&spans, "//");
    assert_eq!(marker.category, ElementCategory::CommentMarker);
    assert!(marker.suppressed);

    let arrow = find(&spans, "->");
    assert_eq!(arrow.category, ElementCategory::LineComment);
    assert!(!arrow.suppressed);
    assert_eq!(arrow.basis, Basis::OutsideContexts);
}

#[test]
fn test_comment_body_follows_full_override() {
    let spans = scan(&guard("{languages: {kotlin: false}}"), "// a -> b", "kotlin");

    let arrow = find(&spans, "->");
    assert!(arrow.suppressed);
    assert_eq!(arrow.basis, Basis::FullyDisabled);
}

#[test]
fn test_markdown_is_fully_enabled() {
    let guard = guard(r#"{"languages": {"markdown": true}}"#);
    let spans = scan(&guard, "a != b // c -> \"=>\" 0xF", "markdown");

    assert!(!spans.is_empty());
    assert!(spans.iter().all(|span| !span.suppressed));
    assert!(spans.iter().all(|span| span.basis == Basis::FullyEnabled));
}

#[test]
fn test_markdown_fence_uses_fence_language() {
    let guard = guard("{languages: {markdown: true}}");
    let text = "x -> y\n```kotlin\na -> b\n```\n";
    let spans = scan(&guard, text, "markdown");

    let arrows: Vec<&LigatureSpan> = spans.iter().filter(|span| span.ligature == "->").collect();
    assert_eq!(arrows.len(), 2);

    assert_eq!(arrows[0].offset, 2);
    assert!(!arrows[0].suppressed);
    assert_eq!(arrows[0].basis, Basis::FullyEnabled);

    assert_eq!(arrows[1].offset, text.rfind("->").expect("fenced arrow"));
    assert_eq!(arrows[1].category, ElementCategory::Operator);
    assert!(arrows[1].suppressed);
    assert_eq!(arrows[1].basis, Basis::LanguageContext);
}

#[test]
fn test_markdown_fence_follows_fence_language_override() {
    let guard = guard("{languages: {markdown: true, kotlin: false}}");
    let spans = scan(&guard, "~~~Kotlin\na == b\n~~~", "markdown");

    let span = find(&spans, "==");
    assert!(span.suppressed);
    assert_eq!(span.basis, Basis::FullyDisabled);
}

#[test]
fn test_number_override_suppresses_radix_prefix() {
    let guard = guard(r#"{"ligaturesByContext": {"number": "+ 0xF 0o7 0b1"}}"#);
    let spans = scan(&guard, "0xFF", "kotlin");

    let span = find(&spans, "0xF");
    assert_eq!(span.category, ElementCategory::Number);
    assert!(span.suppressed);
    assert_eq!(span.basis, Basis::ContextOverride);
    assert_eq!((span.offset, span.length), (0, 3));
}

#[test]
fn test_bundled_config_keeps_letter_ligatures_off() {
    let spans = scan(&LigatureGuard::new(), "let office = 0xFF;", "rust");

    assert!(spans.iter().all(|span| span.ligature != "ffi"));
    assert!(find(&spans, "0xF").suppressed);
}

#[test]
fn test_markup_attribute_value() {
    let guard = guard("{contexts: '+ attribute_value'}");
    let spans = scan(&guard, "<a title=\"x -> y\">a -> b</a>", "html");

    let arrows: Vec<(ElementCategory, bool)> = spans
        .iter()
        .filter(|span| span.ligature == "->")
        .map(|span| (span.category, span.suppressed))
        .collect();
    assert_eq!(
        arrows,
        [
            (ElementCategory::AttributeValue, true),
            (ElementCategory::Text, false),
        ]
    );
    assert_eq!(find(&spans, "</").category, ElementCategory::Punctuation);
}

#[test]
fn test_reconfigure_failure_keeps_last_good() {
    let guard = guard("{languages: {kotlin: true}}");

    let err = match guard.reconfigure("{languages: {kotlin: 'yes'}}") {
        Err(err) => err,
        Ok(_) => panic!("invalid configuration accepted"),
    };
    let GuardError::Config { err, .. } = err else {
        panic!("expected a configuration error");
    };
    assert!(!err.diagnostics().is_empty());

    let spans = scan(&guard, "a != b", "kotlin");
    assert!(!find(&spans, "!=").suppressed);
}

#[test]
fn test_cancelled_scan_leaves_session_unchanged() {
    let guard = guard("{}");
    let tree = TokenTree::parse("a != b", "kotlin");
    let mut session = ScanSession::new();
    session.apply(guard.scan(&tree, ScanOptions::default(), &CancelToken::new()));

    let cancel = CancelToken::new();
    cancel.cancel();
    let delta = session.apply(guard.scan(&tree, ScanOptions::default(), &cancel));

    assert!(delta.is_empty());
    assert_eq!(session.current().len(), 1);
}

#[test]
fn test_caret_line_breaks_every_ligature() {
    let guard = guard("{languages: {kotlin: true}}");
    let tree = TokenTree::parse("x -> y\na == b != c\n", "kotlin");

    let spans = guard.caret_spans(&tree, 9, CursorMode::Line, ScanOptions::default());

    let ligatures: Vec<&str> = spans.iter().map(|span| span.ligature.as_str()).collect();
    assert_eq!(ligatures, ["==", "!="]);
    assert!(spans.iter().all(|span| span.suppressed));
}

// ===================
// Strategies
// ===================

const FRAGMENTS: &[&str] = &[
    "a", "x1", " ", "\n", "->", "!=", "==", "=", "/", "//", "/*", "*/", "\"", "'", "0x", "F", "<", ">",
    "ff", "i", "#", "(", ")", "é",
];

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.concat())
}

const LANGUAGES: &[&str] = &["kotlin", "python", "html", "markdown"];

fn language_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(LANGUAGES)
}

// ===================
// Property Test Functions
// ===================

fn check_spans_are_ordered_and_in_bounds(text: &str, language: &str) -> Result<(), TestCaseError> {
    let guard = LigatureGuard::new();
    let spans = scan(&guard, text, language);

    let mut previous_end = 0;
    for span in &spans {
        prop_assert!(span.offset >= previous_end, "overlap at {} in {:?}", span.offset, text);
        prop_assert!(span.end() <= text.len());
        prop_assert_eq!(&text[span.offset..span.offset + span.ligature.len()], span.ligature.as_str());
        prop_assert!(span.length >= span.ligature.len());
        previous_end = span.offset + span.ligature.len();
    }
    Ok(())
}

fn check_markdown_never_suppresses(text: &str) -> Result<(), TestCaseError> {
    let spans = scan(&LigatureGuard::new(), text, "markdown");

    prop_assert!(spans.iter().all(|span| !span.suppressed));
    Ok(())
}

fn check_caret_off_is_empty(text: &str, caret: usize) -> Result<(), TestCaseError> {
    let guard = LigatureGuard::new();
    let tree = TokenTree::parse(text, "kotlin");

    prop_assert!(guard.caret_spans(&tree, caret, CursorMode::Off, ScanOptions::default()).is_empty());
    // caret scans tolerate offsets past the end or inside a character
    let _ = guard.caret_spans(&tree, caret, CursorMode::Cursor, ScanOptions::default());
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn spans_are_ordered_and_in_bounds(text in text_strategy(), language in language_strategy()) {
        check_spans_are_ordered_and_in_bounds(&text, language)?;
    }

    #[test]
    fn markdown_never_suppresses(text in text_strategy()) {
        check_markdown_never_suppresses(&text)?;
    }

    #[test]
    fn caret_off_is_empty(text in text_strategy(), caret in 0usize..64) {
        check_caret_off_is_empty(&text, caret)?;
    }
}
