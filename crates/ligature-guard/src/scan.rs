//! Document scanning.
//!
//! A [`Scanner`] runs the global matcher over a document, classifies and
//! resolves every match, and reports one [`LigatureSpan`] per match. Caret
//! scans report the ligatures the host should break apart around the caret
//! regardless of configuration. [`ScanSession`] turns successive scans of
//! one document into add/remove deltas.

use std::{
    collections::HashSet,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ligature_guard_config::GlobalConfig;
use ligature_guard_core::{ElementCategory, LigatureMatch};

use crate::{
    classify::classify,
    element::{SyntaxElement, SyntaxTree, effective_language},
    resolve::{Basis, LigatureResolver, Resolution},
};

/// A cooperative cancellation flag shared between a scan and its owner.
///
/// Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Which ligatures are broken apart around the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    #[default]
    Off,
    /// Ligatures whose span (plus one character) contains the caret.
    Cursor,
    /// Every ligature on the caret's line.
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cursor mode `{0}` (expected off, cursor or line)")]
pub struct UnknownCursorMode(String);

impl FromStr for CursorMode {
    type Err = UnknownCursorMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(CursorMode::Off),
            "cursor" => Ok(CursorMode::Cursor),
            "line" => Ok(CursorMode::Line),
            _ => Err(UnknownCursorMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Attach a debug hint to every span, not only to spans decided by a
    /// level with `debug` set.
    pub debug: bool,
}

/// A hint the host may render to show what was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugHint {
    Suppressed,
    Allowed,
}

/// One matched ligature and its decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LigatureSpan {
    /// Byte offset of the first character.
    pub offset: usize,
    /// Byte length, including the extension character if any.
    pub length: usize,
    pub ligature: String,
    pub category: ElementCategory,
    pub suppressed: bool,
    pub basis: Basis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_hint: Option<DebugHint>,
}

impl LigatureSpan {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(Vec<LigatureSpan>),
    /// The scan was cancelled; partial results are discarded.
    Cancelled,
}

impl ScanOutcome {
    pub fn spans(&self) -> Option<&[LigatureSpan]> {
        match self {
            ScanOutcome::Completed(spans) => Some(spans),
            ScanOutcome::Cancelled => None,
        }
    }

    pub fn into_spans(self) -> Option<Vec<LigatureSpan>> {
        match self {
            ScanOutcome::Completed(spans) => Some(spans),
            ScanOutcome::Cancelled => None,
        }
    }
}

/// Scans one document against one configuration snapshot.
#[derive(Debug)]
pub struct Scanner<'a, T> {
    tree: &'a T,
    config: &'a GlobalConfig,
    options: ScanOptions,
}

impl<'a, T: SyntaxTree> Scanner<'a, T> {
    pub fn new(tree: &'a T, config: &'a GlobalConfig, options: ScanOptions) -> Self {
        Self {
            tree,
            config,
            options,
        }
    }

    /// Scans the whole document.
    ///
    /// Matches are searched left to right without overlap. `cancel` is
    /// checked once per match.
    pub fn scan(&self, cancel: &CancelToken) -> ScanOutcome {
        let text = self.tree.text();
        let matcher = self.config.global_matcher();
        let resolver = LigatureResolver::new(self.config, self.tree);

        let mut spans = Vec::new();
        let mut index = 0;
        while index < text.len() {
            if cancel.is_cancelled() {
                info!(offset = index, found = spans.len(); "Scan cancelled");
                return ScanOutcome::Cancelled;
            }
            let Some(found) = matcher.find_at(text, index) else {
                break;
            };
            index = found.end();

            if let Some(span) = self.span(&resolver, &found) {
                spans.push(span);
            }
        }

        debug!(
            bytes = text.len(),
            spans = spans.len(),
            suppressed = spans.iter().filter(|span| span.suppressed).count();
            "Scan completed"
        );
        ScanOutcome::Completed(spans)
    }

    /// The ligatures to break apart on the caret's line.
    ///
    /// Every reported span has `suppressed` set: caret mode overrides the
    /// configured decision.
    pub fn caret_spans(&self, caret: usize, mode: CursorMode) -> Vec<LigatureSpan> {
        if mode == CursorMode::Off {
            return Vec::new();
        }

        let text = self.tree.text();
        let mut caret = caret.min(text.len());
        while !text.is_char_boundary(caret) {
            caret -= 1;
        }
        let line_start = text[..caret].rfind('\n').map_or(0, |index| index + 1);
        let line_end = text[caret..].find('\n').map_or(text.len(), |index| caret + index);
        let line = text[line_start..line_end].trim_end();
        let column = caret - line_start;

        let resolver = LigatureResolver::new(self.config, self.tree);
        let spans: Vec<LigatureSpan> = self
            .config
            .global_matcher()
            .find_iter(line)
            .filter_map(|found| {
                let offset = line_start + found.start();
                let element = self.tree.find_element_at(offset)?;
                let category = classify(&element, found.as_str(), offset);
                let resolution = resolver.resolve(category, &effective_language(&element), found.as_str(), offset);
                let length = found.len() + resolution.extra_span;

                let near_caret = (found.start()..=found.start() + length).contains(&column);
                (mode == CursorMode::Line || near_caret).then(|| LigatureSpan {
                    offset,
                    length,
                    ligature: found.as_str().to_string(),
                    category,
                    suppressed: true,
                    basis: resolution.basis,
                    debug_hint: self.options.debug.then_some(DebugHint::Suppressed),
                })
            })
            .collect();

        debug!(caret = caret, mode:? = mode, spans = spans.len(); "Caret spans computed");
        spans
    }

    fn span(&self, resolver: &LigatureResolver<'_, T>, found: &LigatureMatch<'_>) -> Option<LigatureSpan> {
        let element = self.tree.find_element_at(found.start())?;
        let category = classify(&element, found.as_str(), found.start());
        let resolution = resolver.resolve(category, &effective_language(&element), found.as_str(), found.start());

        Some(LigatureSpan {
            offset: found.start(),
            length: found.len() + resolution.extra_span,
            ligature: found.as_str().to_string(),
            category,
            suppressed: resolution.suppress,
            basis: resolution.basis,
            debug_hint: self.debug_hint(&resolution),
        })
    }

    fn debug_hint(&self, resolution: &Resolution) -> Option<DebugHint> {
        if !(self.options.debug || resolution.debug) {
            return None;
        }
        Some(if resolution.suppress {
            DebugHint::Suppressed
        } else {
            DebugHint::Allowed
        })
    }
}

/// What changed between two scans of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanDelta {
    pub added: Vec<LigatureSpan>,
    pub removed: Vec<LigatureSpan>,
}

impl SpanDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The spans last reported for one document.
///
/// Hosts keep one session per open document and apply the delta of each
/// completed scan, so unchanged highlights are left in place.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    current: Vec<LigatureSpan>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[LigatureSpan] {
        &self.current
    }

    /// Replaces the current spans with those of a completed scan.
    ///
    /// A cancelled outcome changes nothing.
    pub fn apply(&mut self, outcome: ScanOutcome) -> SpanDelta {
        let Some(spans) = outcome.into_spans() else {
            return SpanDelta::default();
        };

        let previous: HashSet<&LigatureSpan> = self.current.iter().collect();
        let next: HashSet<&LigatureSpan> = spans.iter().collect();
        let delta = SpanDelta {
            added: spans.iter().filter(|span| !previous.contains(span)).cloned().collect(),
            removed: self
                .current
                .iter()
                .filter(|span| !next.contains(span))
                .cloned()
                .collect(),
        };

        self.current = spans;
        delta
    }

    /// Forgets every span, reporting them all as removed.
    pub fn clear(&mut self) -> SpanDelta {
        SpanDelta {
            added: Vec::new(),
            removed: std::mem::take(&mut self.current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TokenTree;

    fn scan(text: &str, language: &str, config: &GlobalConfig) -> Vec<LigatureSpan> {
        let tree = TokenTree::parse(text, language);
        Scanner::new(&tree, config, ScanOptions::default())
            .scan(&CancelToken::new())
            .into_spans()
            .expect("scan completes")
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let spans = scan("a <!-- b", "kotlin", &GlobalConfig::baseline());

        let ligatures: Vec<&str> = spans.iter().map(|span| span.ligature.as_str()).collect();
        assert_eq!(ligatures, ["<!--"]);
    }

    #[test]
    fn test_cancelled_scan() {
        let tree = TokenTree::parse("a != b", "kotlin");
        let config = GlobalConfig::baseline();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = Scanner::new(&tree, &config, ScanOptions::default()).scan(&cancel);
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert!(outcome.spans().is_none());
    }

    #[test]
    fn test_debug_option_marks_every_span() {
        let tree = TokenTree::parse("a != b // c -> d", "kotlin");
        let config = GlobalConfig::baseline();
        let options = ScanOptions { debug: true };

        let spans = Scanner::new(&tree, &config, options)
            .scan(&CancelToken::new())
            .into_spans()
            .expect("scan completes");

        let hints: Vec<_> = spans.iter().map(|span| (span.ligature.as_str(), span.debug_hint)).collect();
        assert_eq!(
            hints,
            [
                ("!=", Some(DebugHint::Suppressed)),
                ("//", Some(DebugHint::Suppressed)),
                ("->", Some(DebugHint::Allowed)),
            ]
        );
    }

    #[test]
    fn test_caret_modes() {
        let tree = TokenTree::parse("a -> b\nc != d => e", "kotlin");
        let config = GlobalConfig::baseline();
        let scanner = Scanner::new(&tree, &config, ScanOptions::default());

        assert!(scanner.caret_spans(9, CursorMode::Off).is_empty());

        let line: Vec<usize> = scanner
            .caret_spans(9, CursorMode::Line)
            .iter()
            .map(|span| span.offset)
            .collect();
        assert_eq!(line, [9, 14]);

        // caret right after `!=` still counts
        let cursor = scanner.caret_spans(11, CursorMode::Cursor);
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor[0].ligature, "!=");
        assert!(cursor[0].suppressed);
    }

    #[test]
    fn test_cursor_mode_parses() {
        assert_eq!("LINE".parse::<CursorMode>(), Ok(CursorMode::Line));
        assert!("sideways".parse::<CursorMode>().is_err());
    }

    #[test]
    fn test_session_deltas() {
        let config = GlobalConfig::baseline();
        let mut session = ScanSession::new();

        let first = Scanner::new(&TokenTree::parse("a != b", "kotlin"), &config, ScanOptions::default())
            .scan(&CancelToken::new());
        let delta = session.apply(first);
        assert_eq!(delta.added.len(), 1);
        assert!(delta.removed.is_empty());

        let second = Scanner::new(&TokenTree::parse("a != b -> c", "kotlin"), &config, ScanOptions::default())
            .scan(&CancelToken::new());
        let delta = session.apply(second);
        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].ligature, "->");
        assert!(delta.removed.is_empty());

        assert!(session.apply(ScanOutcome::Cancelled).is_empty());
        assert_eq!(session.current().len(), 2);
        assert_eq!(session.clear().removed.len(), 2);
    }
}
