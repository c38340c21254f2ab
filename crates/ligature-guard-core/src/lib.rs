//! Ligature Guard Core Types and Definitions
//!
//! This crate provides the foundational vocabulary shared by the
//! configuration parser and the scanning engine. It includes:
//!
//! - **Categories**: The closed set of lexical contexts ([`ElementCategory`])
//! - **Catalog**: The default ligature list and its pattern substitutions ([`catalog`])
//! - **Compiler**: Building one boundary-aware matcher from a ligature set ([`compiler`])
//! - **Languages**: Language id normalization ([`language`])
//! - **Spans**: Byte ranges into source text ([`Span`])

pub mod catalog;
pub mod compiler;
pub mod language;

mod category;
mod span;

pub use category::{ElementCategory, UnknownCategory};
pub use compiler::{CompiledMatcher, LigatureMatch, MatcherCache};
pub use span::Span;
