//! Command-line argument definitions for the ligature-guard CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the document and its language, the
//! settings and ligature configuration files, caret mode and report format.

use clap::{Parser, ValueEnum};

use ligature_guard::CursorMode;

/// Command-line arguments for the ligature-guard tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the document to scan
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Language id of the document; guessed from the file extension if absent
    #[arg(short = 'L', long)]
    pub language: Option<String>,

    /// Path to settings file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to a JSON5 ligature configuration, overriding the settings
    #[arg(long)]
    pub ligatures: Option<String>,

    /// Byte offset of the caret; reports caret spans instead of a full scan
    #[arg(long)]
    pub caret: Option<usize>,

    /// Which ligatures the caret breaks apart
    #[arg(long, value_enum)]
    pub cursor_mode: Option<CursorModeArg>,

    /// Attach a debug hint to every span
    #[arg(long)]
    pub debug: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write the report to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One tab-separated line per span
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CursorModeArg {
    Off,
    Cursor,
    Line,
}

impl From<CursorModeArg> for CursorMode {
    fn from(mode: CursorModeArg) -> Self {
        match mode {
            CursorModeArg::Off => CursorMode::Off,
            CursorModeArg::Cursor => CursorMode::Cursor,
            CursorModeArg::Line => CursorMode::Line,
        }
    }
}
