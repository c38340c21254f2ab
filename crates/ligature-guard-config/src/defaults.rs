//! The configuration a new engine starts from.

/// Bundled default settings.
///
/// The `f` ligatures are disregarded outright, markdown keeps every ligature,
/// and numeric literals suppress the radix-prefix ligatures that the global
/// level leaves alone.
pub const DEFAULT_CONFIG: &str = r#"{
  // Text ligatures are never touched.
  disregarded: 'ff fi fl ffi ffl',

  languages: {
    markdown: true,
  },

  ligaturesByContext: {
    number: {
      ligatures: '+ 0xF 0o7 0b1',
    },
  },
}
"#;
