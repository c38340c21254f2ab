//! JSON5 to JSON normalization.
//!
//! Settings are written in a relaxed JSON5 dialect: comments, unquoted keys,
//! single-quoted strings, trailing commas. [`normalize`] rewrites such text
//! into strict JSON in one pass. Strict JSON passes through unchanged, and
//! normalizing twice gives the same result as normalizing once.
//!
//! Block comments become the same number of spaces (line breaks and tabs are
//! kept) so line numbers in later error messages still match the document.
//! Line comments are dropped together with the horizontal whitespace before
//! them.

/// Converts JSON5-like text into strict JSON text.
///
/// # Example
///
/// ```
/// # use ligature_guard_config::json5::normalize;
/// let json = normalize("{foo: 'bar', // note\n baz: [1, 2,],}");
/// assert_eq!(json, "{\"foo\": \"bar\",\n \"baz\": [1, 2]}");
/// ```
pub fn normalize(input: &str) -> String {
    let mut normalizer = Normalizer {
        src: input,
        pos: 0,
        out: String::with_capacity(input.len() + input.len() / 8),
        pending_comma: None,
    };
    normalizer.run();
    normalizer.out
}

struct Normalizer<'a> {
    src: &'a str,
    pos: usize,
    out: String,
    /// Output offset of a comma that is dropped if the next significant
    /// character closes an array or object.
    pending_comma: Option<usize>,
}

impl Normalizer<'_> {
    fn run(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => {
                    self.settle_comma(false);
                    self.string(c);
                }
                '/' if self.rest().starts_with("//") => self.line_comment(),
                '/' if self.rest().starts_with("/*") => self.block_comment(),
                ',' => {
                    self.settle_comma(false);
                    self.pending_comma = Some(self.out.len());
                    self.copy(c);
                }
                ']' | '}' => {
                    self.settle_comma(true);
                    self.copy(c);
                }
                c if c.is_whitespace() => self.copy(c),
                c if is_identifier_start(c) => {
                    self.settle_comma(false);
                    self.word();
                }
                c => {
                    self.settle_comma(false);
                    self.copy(c);
                }
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn copy(&mut self, c: char) {
        self.out.push(c);
        self.pos += c.len_utf8();
    }

    fn settle_comma(&mut self, closing: bool) {
        if let Some(index) = self.pending_comma.take() {
            if closing {
                self.out.remove(index);
            }
        }
    }

    /// A bare word: quoted when it is an object key, copied otherwise.
    fn word(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(self.rest().len());
        let word = &self.src[self.pos..self.pos + len];
        self.pos += len;

        if next_significant(self.rest()) == Some(':') {
            self.out.push('"');
            self.out.push_str(word);
            self.out.push('"');
        } else {
            self.out.push_str(word);
        }
    }

    fn line_comment(&mut self) {
        let kept = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(kept);
        let len = self.rest().find(['\n', '\r']).unwrap_or(self.rest().len());
        self.pos += len;
    }

    fn block_comment(&mut self) {
        let len = self
            .rest()
            .get(2..)
            .and_then(|body| body.find("*/"))
            .map_or(self.rest().len(), |end| end + 4);
        let comment = &self.src[self.pos..self.pos + len];
        for c in comment.chars() {
            match c {
                '\n' | '\r' | '\t' => self.out.push(c),
                _ => self.out.push(' '),
            }
        }
        self.pos += len;
    }

    fn string(&mut self, quote: char) {
        self.pos += quote.len_utf8();
        self.out.push('"');
        loop {
            match self.bump() {
                None => break,
                Some('\\') => self.escape(),
                Some(c) if c == quote => break,
                Some('"') => self.out.push_str("\\\""),
                Some('\r') => self.out.push_str("\\r"),
                Some('\n') => self.out.push_str("\\n"),
                Some('\t') => self.out.push_str("\\t"),
                Some(c) => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    /// Rewrites the escape following a backslash inside a string.
    fn escape(&mut self) {
        match self.bump() {
            None => self.out.push_str("\\\\"),
            Some('\r') => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                    self.out.push_str("\\r\\n");
                } else {
                    self.out.push_str("\\r");
                }
            }
            Some('\n') => self.out.push_str("\\n"),
            Some('\'') => self.out.push('\''),
            Some(c) => {
                self.out.push('\\');
                self.out.push(c);
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// The first character of `text` that is not whitespace or inside a comment.
fn next_significant(text: &str) -> Option<char> {
    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if let Some(body) = rest.strip_prefix("//") {
            rest = body.find(['\n', '\r']).map_or("", |end| &body[end..]);
        } else if let Some(body) = rest.strip_prefix("/*") {
            rest = body.find("*/").map_or("", |end| &body[end + 2..]);
        } else {
            return rest.chars().next();
        }
    }
}
