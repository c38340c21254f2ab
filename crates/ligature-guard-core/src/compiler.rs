//! Compiling ligature sets into boundary-aware matchers.
//!
//! A [`CompiledMatcher`] is one alternation over a set of ligature tokens,
//! ordered longest first so that `===` wins over `==`. Each literal
//! alternative is wrapped in negative lookaround guards derived from the
//! longer tokens it occurs inside, so a lone `->` is not carved out of a
//! `-->` that the active set does not contain. Catalog tokens listed in
//! [`PATTERN_SUBSTITUTIONS`](crate::catalog::PATTERN_SUBSTITUTIONS) compile
//! to their hand-written pattern instead of a literal.
//!
//! # Example
//!
//! ```
//! # use std::collections::BTreeSet;
//! # use ligature_guard_core::compiler::compile;
//! let matcher = compile(["-", "->", "-->"], &BTreeSet::new());
//! let found = matcher.find_at("a --> b", 0).expect("arrow is matched");
//! assert_eq!(found.as_str(), "-->");
//! ```

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::Arc,
};

use fancy_regex::{Regex, RegexBuilder};
use log::{debug, error, trace, warn};

use crate::catalog::substitution_for;

/// Characters that chain into longer arrow and equality runs.
const CONNECTIVE: &str = "-=~<>|";

/// Connective characters that extend a run of themselves (`--`, `==`, `~~`).
const SELF_EXTENDING: &str = "-=~";

/// Upper bound on backtracking steps for one search.
///
/// An unanchored search spends one step per failed alternative per start
/// position, so the bound scales with document size rather than pattern
/// complexity. Generated patterns have no nested repetition.
const BACKTRACK_LIMIT: usize = 50_000_000;

/// A single ligature occurrence in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigatureMatch<'t> {
    start: usize,
    end: usize,
    text: &'t str,
}

impl<'t> LigatureMatch<'t> {
    /// Byte offset of the first character.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length match.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The matched text.
    pub fn as_str(&self) -> &'t str {
        self.text
    }
}

/// A matcher compiled from one ligature set.
///
/// Holds two regexes over the same alternation: a searcher for scanning and
/// an anchored twin for exact membership tests. A matcher compiled from an
/// empty set has neither and never matches.
pub struct CompiledMatcher {
    ligatures: BTreeSet<String>,
    pattern: String,
    searcher: Option<Regex>,
    exact: Option<Regex>,
}

impl CompiledMatcher {
    /// A matcher that matches nothing.
    pub fn empty() -> Self {
        Self {
            ligatures: BTreeSet::new(),
            pattern: String::new(),
            searcher: None,
            exact: None,
        }
    }

    /// The ligature tokens this matcher was compiled from.
    pub fn ligatures(&self) -> &BTreeSet<String> {
        &self.ligatures
    }

    /// The generated alternation, empty when nothing can match.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the matcher can never match.
    pub fn is_empty(&self) -> bool {
        self.searcher.is_none()
    }

    /// Finds the leftmost ligature starting at or after byte offset `pos`.
    ///
    /// Lookbehind guards still see the text before `pos`.
    pub fn find_at<'t>(&self, text: &'t str, pos: usize) -> Option<LigatureMatch<'t>> {
        let searcher = self.searcher.as_ref()?;
        if pos > text.len() {
            return None;
        }
        match searcher.find_from_pos(text, pos) {
            Ok(found) => found.map(|m| LigatureMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            }),
            Err(err) => {
                warn!(error = err.to_string(), pos; "Ligature search aborted");
                None
            }
        }
    }

    /// Iterates over successive non-overlapping matches.
    pub fn find_iter<'m, 't>(&'m self, text: &'t str) -> Matches<'m, 't> {
        Matches {
            matcher: self,
            text,
            pos: 0,
        }
    }

    /// Returns `true` if the whole of `text` is one ligature of this set.
    pub fn matches_exactly(&self, text: &str) -> bool {
        let Some(exact) = self.exact.as_ref() else {
            return false;
        };
        exact.is_match(text).unwrap_or_else(|err| {
            warn!(error = err.to_string(), text; "Ligature membership test aborted");
            false
        })
    }
}

impl fmt::Debug for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMatcher")
            .field("ligatures", &self.ligatures.len())
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Iterator over the matches of a [`CompiledMatcher`].
#[derive(Debug)]
pub struct Matches<'m, 't> {
    matcher: &'m CompiledMatcher,
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = LigatureMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = self.matcher.find_at(self.text, self.pos)?;
        self.pos = if found.is_empty() {
            next_boundary(self.text, found.end())
        } else {
            found.end()
        };
        Some(found)
    }
}

/// Compiles a ligature set into a matcher.
///
/// `omitted` lists known ligatures that are not part of the set. They never
/// match, but their presence still guards the edges of shorter members, so
/// `<-` does not fire inside an omitted `<--`.
///
/// Empty tokens are ignored; an empty set yields [`CompiledMatcher::empty`].
pub fn compile<I, S>(ligatures: I, omitted: &BTreeSet<String>) -> CompiledMatcher
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ligatures: BTreeSet<String> = ligatures
        .into_iter()
        .map(|token| token.as_ref().to_string())
        .filter(|token| !token.is_empty())
        .collect();

    if ligatures.is_empty() {
        return CompiledMatcher::empty();
    }

    let mut ordered: Vec<&str> = ligatures.iter().map(String::as_str).collect();
    ordered.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });

    let neighbors: Vec<&str> = ligatures
        .iter()
        .chain(omitted.iter())
        .map(String::as_str)
        .collect();

    let pattern = ordered
        .iter()
        .map(|token| alternative(token, &neighbors))
        .collect::<Vec<_>>()
        .join("|");

    trace!(pattern = pattern.as_str(); "Generated ligature pattern");

    match build_pair(&pattern) {
        Ok((searcher, exact)) => CompiledMatcher {
            ligatures,
            pattern,
            searcher: Some(searcher),
            exact: Some(exact),
        },
        Err(err) => {
            error!(error = err.to_string(), pattern = pattern.as_str(); "Ligature pattern failed to compile");
            debug_assert!(false, "ligature pattern failed to compile: {err}");
            CompiledMatcher::empty()
        }
    }
}

/// Deduplicates compiled matchers by ligature set.
///
/// One configuration usually repeats the same list in many places (every
/// language inherits the global list), so each distinct set is compiled once
/// and shared.
#[derive(Debug, Default)]
pub struct MatcherCache {
    entries: HashMap<(BTreeSet<String>, BTreeSet<String>), Arc<CompiledMatcher>>,
    hits: usize,
}

impl MatcherCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the matcher for `ligatures`, compiling it on first use.
    pub fn get_or_compile(
        &mut self,
        ligatures: &BTreeSet<String>,
        omitted: &BTreeSet<String>,
    ) -> Arc<CompiledMatcher> {
        let key = (ligatures.clone(), omitted.clone());
        if let Some(matcher) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(matcher);
        }

        let matcher = Arc::new(compile(ligatures, omitted));
        debug!(ligatures = ligatures.len(), cached = self.entries.len(); "Compiled ligature matcher");
        self.entries.insert(key, Arc::clone(&matcher));
        matcher
    }

    /// Number of distinct matchers compiled so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

fn build_pair(pattern: &str) -> Result<(Regex, Regex), fancy_regex::Error> {
    let searcher = RegexBuilder::new(pattern)
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()?;
    let exact = RegexBuilder::new(&format!("^(?:{pattern})$"))
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()?;
    Ok((searcher, exact))
}

/// Builds the alternative for one token.
fn alternative(token: &str, neighbors: &[&str]) -> String {
    if let Some(pattern) = substitution_for(token) {
        return pattern.to_string();
    }

    let mut leading = BTreeSet::new();
    let mut trailing = BTreeSet::new();
    let token_chars = token.chars().count();

    for other in neighbors {
        if other.chars().count() <= token_chars {
            continue;
        }
        for (index, _) in other.char_indices() {
            if !other[index..].starts_with(token) {
                continue;
            }
            if let Some(c) = other[..index].chars().next_back() {
                leading.insert(c);
            }
            if let Some(c) = other[index + token.len()..].chars().next() {
                trailing.insert(c);
            }
        }
    }

    if token_chars <= 2 && token.chars().all(|c| CONNECTIVE.contains(c)) {
        if let Some(first) = token.chars().next().filter(|c| SELF_EXTENDING.contains(*c)) {
            leading.insert(first);
        }
        if let Some(last) = token
            .chars()
            .next_back()
            .filter(|c| SELF_EXTENDING.contains(*c))
        {
            trailing.insert(last);
        }
    }

    let mut alternative = String::new();
    if !leading.is_empty() {
        alternative.push_str("(?<!");
        push_class(&mut alternative, &leading);
        alternative.push(')');
    }
    push_escaped(&mut alternative, token);
    if !trailing.is_empty() {
        alternative.push_str("(?!");
        push_class(&mut alternative, &trailing);
        alternative.push(')');
    }
    alternative
}

fn push_escaped(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
}

fn push_class(out: &mut String, chars: &BTreeSet<char>) {
    out.push('[');
    for &c in chars {
        if "\\[]^-".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(']');
}

fn next_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| offset + c.len_utf8())
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Strategy for a set of connective ligatures and one chosen member.
    fn connective_set_strategy() -> impl Strategy<Value = (Vec<String>, usize)> {
        proptest::collection::btree_set("[-=<>|~]{1,4}", 1..12).prop_flat_map(|set| {
            let tokens: Vec<String> = set.into_iter().collect();
            let len = tokens.len();
            (Just(tokens), 0..len)
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A member surrounded by spaces is matched whole, exactly once.
    fn check_isolated_member_matches_whole(
        tokens: &[String],
        chosen: usize,
    ) -> Result<(), TestCaseError> {
        let matcher = compile(tokens, &BTreeSet::new());
        let token = &tokens[chosen];
        let text = format!(" {token} ");

        let found: Vec<_> = matcher.find_iter(&text).map(|m| m.as_str()).collect();
        prop_assert_eq!(found, vec![token.as_str()], "pattern {}", matcher.pattern());
        Ok(())
    }

    /// Every member is recognized by the exact membership test.
    fn check_members_match_exactly(tokens: &[String]) -> Result<(), TestCaseError> {
        let matcher = compile(tokens, &BTreeSet::new());
        for token in tokens {
            prop_assert!(
                matcher.matches_exactly(token),
                "`{}` not matched by {}",
                token,
                matcher.pattern()
            );
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn isolated_member_matches_whole((tokens, chosen) in connective_set_strategy()) {
            check_isolated_member_matches_whole(&tokens, chosen)?;
        }

        #[test]
        fn members_match_exactly((tokens, _) in connective_set_strategy()) {
            check_members_match_exactly(&tokens)?;
        }
    }
}
