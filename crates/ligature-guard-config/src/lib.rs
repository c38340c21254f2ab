//! # Ligature Guard Config
//!
//! Parser for the layered ligature configuration format. A document has a
//! global level, per-language levels that may inherit from each other, and
//! per-context overrides at every level. Text is written in a relaxed JSON5
//! dialect and normalized to strict JSON before parsing.
//!
//! ## Usage
//!
//! ```
//! # use ligature_guard_config::{parse, ParseError};
//! # use ligature_guard_core::ElementCategory;
//! fn main() -> Result<(), ParseError> {
//!     let config = parse(r#"{
//!         // numbers keep no ligatures
//!         ligaturesByContext: { number: '+ 0xF 0o7 0b1' },
//!         languages: { markdown: true },
//!     }"#)?;
//!
//!     let number = config.level().effective(ElementCategory::Number).unwrap();
//!     assert!(number.suppresses("0xF"));
//!     assert_eq!(config.language("Markdown").full_on_or_off(), Some(true));
//!     Ok(())
//! }
//! ```

mod defaults;
mod draft;
mod elaborate;
pub mod error;
pub mod json5;
mod model;
mod parser;

pub use defaults::DEFAULT_CONFIG;
pub use error::{Diagnostic, ErrorCode, ParseError};
pub use model::{ContextConfig, GlobalConfig, LanguageConfig};

use log::{debug, info};

use ligature_guard_core::Span;

/// Parses JSON5-like configuration text.
///
/// Source spans in syntax diagnostics refer to the normalized text, which
/// [`json5::normalize`] reproduces; it keeps the line structure of
/// `source` except where a string contained raw line breaks.
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per problem found.
pub fn parse(source: &str) -> Result<GlobalConfig, ParseError> {
    info!(bytes = source.len(); "Parsing ligature configuration");
    let json = json5::normalize(source);
    debug!(bytes = json.len(); "Configuration normalized");
    parse_json(&json)
}

/// Parses strict JSON configuration text.
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per problem found.
pub fn parse_json(json: &str) -> Result<GlobalConfig, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|err| syntax_error(&err, json))?;
    let document = parser::parse_document(&value)?;
    Ok(elaborate::elaborate(document))
}

fn syntax_error(err: &serde_json::Error, json: &str) -> Diagnostic {
    let span = line_column_span(json, err.line(), err.column());
    let message = err.to_string();
    // serde appends " at line L column C"; the label carries the location
    let message = message
        .rfind(" at line ")
        .map_or(message.as_str(), |index| &message[..index]);

    Diagnostic::error(format!("malformed configuration: {message}"))
        .with_code(ErrorCode::E001)
        .with_label(span, "here")
}

/// Converts a 1-based line and column into a one-character byte span.
fn line_column_span(text: &str, line: usize, column: usize) -> Span {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let width = text[offset..].chars().next().map_or(0, char::len_utf8);
    Span::new(offset..offset + width)
}
