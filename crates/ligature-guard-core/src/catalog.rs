//! The default ligature catalog and its pattern substitutions.
//!
//! Catalog entries are token names. Most are matched literally; a few name a
//! family of character sequences and are replaced by a hand-written pattern
//! from [`PATTERN_SUBSTITUTIONS`] when a matcher is compiled. Disregarding and
//! re-adding ligatures always operates on the token names, never on the
//! substituted patterns.

use std::collections::BTreeSet;

/// Every ligature the engine knows about, whitespace separated.
const BASE_LIGATURES: &str = r".= ..= .- := =:= == != === !== =/= <-< <<- <-- <- <-> -> --> ->> >-> <=< <<= <== <=> => ==> =!= =:= =>> >=> >>= >>- >- <~> -< -<< =<< <~~ <~ ~~ ~> ~~> <<< << <= <> >= >> >>> {. {| [| <: :> |] |} .} <||| <|| <| <|> |> ||> |||> <$ <$> $> <+ <+> +> <* <*> *> \\ \\\ \* /* */ /// // </ <!-- </> --> /> ;; :: ::: .. ... ..< !! ?? %% && <:< || ?. ?: ++ +++ -- --- ** *** ~= ~- www ff fi fl ffi ffl -~ ~@ ^= ?= /= /== |= ||= #! ## ### #### #{ #[ ]# #( #? #_ #: #= #_( #{} =~ !~ 9x9 0xF 0o7 0b1 |- |-- -| --| |== =| ==| /==/ ==/ /=/ <~~> =>= =<= :>: :<: /\ \/ _|_ ||- :< >: ::= <==== ==== ====> <====> <--- ---> <---> |--- ---| |=== ===| /=== ===/ <~~~ ~~~> <~~~>";

/// Catalog tokens that stand for a family of sequences, with the pattern
/// each one compiles to.
pub const PATTERN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("0xF", r"(?<![0-9A-Za-z_])0x[0-9A-Fa-f]"),
    ("0o7", r"(?<![0-9A-Za-z_])0o[0-7]"),
    ("0b1", r"(?<![0-9A-Za-z_])0b[01]"),
    ("9x9", r"\dx\d"),
    ("www", r"\bwww\b"),
    ("---", r"-{3,}"),
    ("====", r"={4,}"),
    ("####", r"#{4,}"),
    ("***", r"\*{3,}"),
    ("+++", r"\+{3,}"),
];

/// Ligatures listed (and therefore acted on) at the global level before any
/// configuration is applied.
pub const DEFAULT_LISTED: &[&str] = &["ff", "fi", "fl", "ffi", "ffl", "0xF", "0o7", "0b1", "9x9"];

/// The default catalog tokens, in declaration order, without duplicates.
pub fn base_ligatures() -> Vec<&'static str> {
    let mut seen = BTreeSet::new();
    BASE_LIGATURES
        .split_whitespace()
        .filter(|token| seen.insert(*token))
        .collect()
}

/// The default catalog as a set.
pub fn default_catalog() -> BTreeSet<String> {
    base_ligatures().into_iter().map(str::to_string).collect()
}

/// Returns the hand-written pattern for a substituted token, if any.
pub fn substitution_for(token: &str) -> Option<&'static str> {
    PATTERN_SUBSTITUTIONS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, pattern)| *pattern)
}
