//! Ligature Guard - context-aware font ligature suppression.
//!
//! Programming fonts draw sequences such as `->` or `!=` as single glyphs.
//! That helps in code and hurts elsewhere: inside strings, in hex literals,
//! around the caret. This crate decides, per match, whether a ligature
//! should be drawn, using a layered configuration (see
//! [`ligature_guard_config`]) and the syntax tree of the document.
//!
//! The host editor supplies the tree through [`SyntaxTree`] and
//! [`SyntaxElement`]; [`tree::TokenTree`] is a small reference
//! implementation used by the command-line tool.
//!
//! # Examples
//!
//! ```rust
//! use ligature_guard::{CancelToken, LigatureGuard, ScanOptions, tree::TokenTree};
//!
//! let guard = LigatureGuard::new();
//! let tree = TokenTree::parse("if (a != b) x = 0xFF", "kotlin");
//!
//! let spans = guard
//!     .scan(&tree, ScanOptions::default(), &CancelToken::new())
//!     .into_spans()
//!     .expect("not cancelled");
//! assert!(spans.iter().any(|span| span.ligature == "!=" && span.suppressed));
//! ```

pub mod classify;
pub mod element;
pub mod resolve;
pub mod scan;
pub mod tree;

mod error;

pub use ligature_guard_config as config;
pub use ligature_guard_core::ElementCategory;

pub use element::{SyntaxElement, SyntaxTree};
pub use error::GuardError;
pub use resolve::{Basis, LigatureResolver, Resolution};
pub use scan::{
    CancelToken, CursorMode, DebugHint, LigatureSpan, ScanOptions, ScanOutcome, ScanSession,
    Scanner, SpanDelta,
};

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};

use ligature_guard_config::{DEFAULT_CONFIG, GlobalConfig, json5};

/// Holds the active configuration and scans documents against it.
///
/// Scans take a snapshot of the configuration when they start, so
/// [`reconfigure`](Self::reconfigure) never disturbs a scan in flight.
#[derive(Debug)]
pub struct LigatureGuard {
    current: RwLock<Arc<GlobalConfig>>,
}

impl LigatureGuard {
    /// Create a guard with the bundled default configuration.
    ///
    /// Falls back to [`GlobalConfig::baseline`] should the bundled text ever
    /// fail to parse.
    pub fn new() -> Self {
        let config = match ligature_guard_config::parse(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = err.to_string(); "Bundled configuration rejected, using baseline");
                GlobalConfig::baseline()
            }
        };
        Self::with_config(config)
    }

    /// Create a guard with an already parsed configuration.
    pub fn with_config(config: GlobalConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Create a guard from configuration text.
    ///
    /// Warnings do not reject the text; they are kept on the snapshot, see
    /// [`GlobalConfig::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Config`] when the text does not parse.
    pub fn from_source(source: &str) -> Result<Self, GuardError> {
        let config = ligature_guard_config::parse(source)
            .map_err(|err| GuardError::new_config_error(err, json5::normalize(source)))?;
        if !config.warnings().is_empty() {
            warn!(warnings = config.warnings().len(); "Configuration accepted with warnings");
        }
        Ok(Self::with_config(config))
    }

    /// The configuration scans currently run against.
    pub fn snapshot(&self) -> Arc<GlobalConfig> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Replaces the configuration with one parsed from `source`.
    ///
    /// On failure the previous configuration stays active.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Config`] when the text does not parse.
    pub fn reconfigure(&self, source: &str) -> Result<Arc<GlobalConfig>, GuardError> {
        match ligature_guard_config::parse(source) {
            Ok(config) => {
                let config = Arc::new(config);
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&config);
                info!(
                    catalog = config.catalog().len(),
                    warnings = config.warnings().len();
                    "Configuration replaced"
                );
                Ok(config)
            }
            Err(err) => {
                warn!(
                    diagnostics = err.diagnostics().len();
                    "Configuration rejected, keeping the previous one"
                );
                Err(GuardError::new_config_error(err, json5::normalize(source)))
            }
        }
    }

    /// Scans a document with the current configuration.
    pub fn scan<T: SyntaxTree>(&self, tree: &T, options: ScanOptions, cancel: &CancelToken) -> ScanOutcome {
        let config = self.snapshot();
        debug!(bytes = tree.text().len(); "Starting scan");
        Scanner::new(tree, &config, options).scan(cancel)
    }

    /// The ligatures to break apart around `caret` with the current
    /// configuration.
    pub fn caret_spans<T: SyntaxTree>(
        &self,
        tree: &T,
        caret: usize,
        mode: CursorMode,
        options: ScanOptions,
    ) -> Vec<LigatureSpan> {
        let config = self.snapshot();
        Scanner::new(tree, &config, options).caret_spans(caret, mode)
    }
}

impl Default for LigatureGuard {
    fn default() -> Self {
        Self::new()
    }
}
