//! Report rendering for scan results.

use std::io;

use ligature_guard::{Basis, DebugHint, LigatureSpan};

use crate::args::Format;

/// Renders `spans`, one line each.
pub fn render(spans: &[LigatureSpan], format: Format) -> io::Result<String> {
    let mut out = String::new();
    for span in spans {
        match format {
            Format::Text => text_line(&mut out, span),
            Format::Json => {
                out.push_str(&serde_json::to_string(span).map_err(io::Error::from)?);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn text_line(out: &mut String, span: &LigatureSpan) {
    let decision = if span.suppressed { "suppressed" } else { "allowed" };
    out.push_str(&format!(
        "{}..{}\t{}\t{}\t{}\t{}",
        span.offset,
        span.end(),
        span.ligature,
        span.category,
        decision,
        basis_name(span.basis),
    ));
    match span.debug_hint {
        Some(DebugHint::Suppressed) => out.push_str("\tdebug:suppressed"),
        Some(DebugHint::Allowed) => out.push_str("\tdebug:allowed"),
        None => {}
    }
    out.push('\n');
}

fn basis_name(basis: Basis) -> &'static str {
    match basis {
        Basis::FullyEnabled => "fully_enabled",
        Basis::FullyDisabled => "fully_disabled",
        Basis::ContextOverride => "context_override",
        Basis::LanguageContext => "language_context",
        Basis::OutsideContexts => "outside_contexts",
    }
}
