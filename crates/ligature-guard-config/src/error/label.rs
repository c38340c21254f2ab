//! Labeled source spans for diagnostic messages.

use ligature_guard_core::Span;

/// A labeled span in the configuration text.
///
/// Spans refer to the normalized JSON text, which keeps the line structure
/// of the original document.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
