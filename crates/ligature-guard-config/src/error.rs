//! Error and diagnostic system for the configuration parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - JSON paths pointing at the offending value
//! - Labeled source spans for syntax errors
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, the JSON path of
//! the value it concerns, source locations, and help text. Multiple
//! diagnostics are wrapped in [`ParseError`] for returning from
//! [`parse`](crate::parse).
//!
//! # Example
//!
//! ```
//! # use ligature_guard_config::error::{Diagnostic, ErrorCode};
//!
//! let diag = Diagnostic::error("unknown field `colour`")
//!     .with_code(ErrorCode::E100)
//!     .with_path("languages.kotlin.colour")
//!     .with_help("expected one of `contexts`, `debug`, `inherit`, `ligatures`, `ligaturesByContext`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
