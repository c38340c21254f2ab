//! The core diagnostic type for configuration errors.

use std::fmt;

use ligature_guard_core::Span;

use crate::error::{Label, Severity, error_code::ErrorCode};

/// A diagnostic message about a configuration document.
///
/// Carries a severity, an optional error code, a message, the JSON path of
/// the value it concerns (e.g. `languages.kotlin.ligatures`), labeled source
/// spans, and optional help text.
///
/// # Example
///
/// ```text
/// error[E102]: invalid ligature control token `?` at `ligatures`
///    = help: one-character tokens must be `+`, `-`, `0`, `O` or `X`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    path: Option<String>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the JSON path of the offending value, if known.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the JSON path. An empty path denotes the document root.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a label pointing into the configuration text.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            path: None,
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message at `path`" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        match self.path.as_deref() {
            Some("") => write!(f, " at document root"),
            Some(path) => write!(f, " at `{path}`"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for Diagnostic {}
