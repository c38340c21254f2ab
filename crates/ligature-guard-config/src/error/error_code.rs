//! Error codes for configuration diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Syntax errors
//! - `E1xx` - Structure errors
//! - `E2xx` - Resolution errors

use std::fmt;

/// Error codes for categorizing configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    ///
    /// The document is not valid JSON after JSON5 normalization, or its root
    /// is not an object.
    E001,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Unknown field.
    ///
    /// A key is not recognized, or is not allowed at this level (`languages`
    /// and `disregarded` below the global level, `debug` and `inherit` at the
    /// global level).
    E100,

    /// Type mismatch.
    ///
    /// A value has the wrong JSON type, e.g. a number where a boolean or a
    /// ligature list was expected.
    E101,

    /// Invalid control token.
    ///
    /// A one-character token in a ligature or context list is not one of
    /// `+`, `-`, `0`, `O` (and `X` for ligature lists).
    E102,

    /// Invalid context name.
    ///
    /// A context list or `ligaturesByContext` key does not name a category.
    E103,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Unresolved inheritance.
    ///
    /// One or more languages inherit from a language that does not exist, or
    /// inherit from each other in a cycle.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Syntax errors
            ErrorCode::E001 => "E001",
            // Structure errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            // Resolution errors
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Syntax errors
            ErrorCode::E001 => "malformed JSON",
            // Structure errors
            ErrorCode::E100 => "unknown field",
            ErrorCode::E101 => "type mismatch",
            ErrorCode::E102 => "invalid control token",
            ErrorCode::E103 => "invalid context name",
            // Resolution errors
            ErrorCode::E200 => "unresolved inheritance",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
