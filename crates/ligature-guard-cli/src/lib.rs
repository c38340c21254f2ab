//! Ligature Guard CLI library
//!
//! This module contains the command-line logic: it loads settings and the
//! ligature configuration, tokenizes the input document and reports the
//! decision for every ligature found.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod report;

pub use args::{Args, CursorModeArg, Format};
pub use config::{Settings, SettingsError, load_settings};
pub use error::CliError;

use std::{fs, path::Path};

use log::{info, warn};

use ligature_guard::{CancelToken, CursorMode, LigatureGuard, ScanOptions, tree::TokenTree};
use ligature_guard_config::json5;

/// Run the ligature-guard CLI application
///
/// Scans the input file, or reports the caret spans when `--caret` is
/// given, and writes the report to the output file or standard output.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Settings loading errors
/// - Ligature configuration errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Scanning document");

    let settings = config::load_settings(args.config.as_ref())?;
    let guard = build_guard(args, &settings)?;

    let text = fs::read_to_string(&args.input)?;
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| language_for_path(&args.input).to_string());
    let tree = TokenTree::parse(text, language);

    let options = ScanOptions {
        debug: args.debug || settings.debug,
    };
    let spans = match args.caret {
        Some(caret) => {
            let mode = args.cursor_mode.map_or(settings.cursor_mode, CursorMode::from);
            guard.caret_spans(&tree, caret, mode, options)
        }
        // the token is never cancelled here
        None => guard
            .scan(&tree, options, &CancelToken::new())
            .into_spans()
            .unwrap_or_default(),
    };

    let report = report::render(&spans, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, report)?;
            info!(output_file = path.as_str(), spans = spans.len(); "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}

/// Picks the ligature configuration: `--ligatures`, then the settings file,
/// then the bundled default. Warnings of the chosen configuration are
/// rendered to the log.
fn build_guard(args: &Args, settings: &Settings) -> Result<LigatureGuard, CliError> {
    let source = if let Some(path) = &args.ligatures {
        Some(fs::read_to_string(path)?)
    } else if let Some(path) = &settings.ligatures_file {
        Some(fs::read_to_string(path)?)
    } else {
        settings.ligatures.clone()
    };

    let Some(source) = source else {
        return Ok(LigatureGuard::new());
    };
    let guard = LigatureGuard::from_source(&source)?;

    let config = guard.snapshot();
    let normalized = json5::normalize(&source);
    for reportable in error_adapter::warning_reportables(&config, &normalized) {
        warn!("{}", error_adapter::render(&reportable));
    }
    Ok(guard)
}

/// Guesses a language id from the file extension.
pub fn language_for_path(path: impl AsRef<Path>) -> &'static str {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("rs") => "rust",
        Some("kt" | "kts") => "kotlin",
        Some("java") => "java",
        Some("js" | "mjs" | "cjs") => "javascript",
        Some("ts") => "typescript",
        Some("go") => "go",
        Some("c" | "h") => "c",
        Some("cpp" | "cc" | "hpp") => "cpp",
        Some("py") => "python",
        Some("rb") => "ruby",
        Some("sh" | "bash") => "shell_script",
        Some("html" | "htm") => "html",
        Some("xml") => "xml",
        Some("svg") => "svg",
        Some("md" | "markdown") => "markdown",
        Some("json") => "json",
        Some("toml") => "toml",
        Some("yaml" | "yml") => "yaml",
        _ => "text",
    }
}
