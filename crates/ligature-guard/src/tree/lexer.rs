//! Tokenizer behind [`TokenTree::parse`](super::TokenTree::parse).
//!
//! Code is split into a flat token run. Markup is split into tags, comments,
//! doctypes and text, each opened and closed as a composite node so that the
//! classifier can see attribute and text structure through parents.
//! Markdown is lexed as code, except that fenced code blocks become
//! `CODE_FENCE` nodes whose body is lexed in the fence's own language.
//!
//! The lexer never fails: anything it cannot place becomes a one-character
//! `BAD_CHARACTER` token.

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::Caseless,
    combinator::{alt, not, opt, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, one_of, rest, take, take_till, take_until, take_while},
};

use ligature_guard_core::language::{is_markup_language, normalize_language_id};

/// Tags produced by the lexer.
pub mod kind {
    pub const FILE: &str = "FILE";
    pub const BAD_CHARACTER: &str = "BAD_CHARACTER";
    pub const WHITE_SPACE: &str = "WHITE_SPACE";

    pub const SHEBANG: &str = "SHEBANG";
    pub const LINE_COMMENT: &str = "LINE_COMMENT";
    pub const BLOCK_COMMENT: &str = "BLOCK_COMMENT";
    pub const DOC_COMMENT: &str = "DOC_COMMENT";
    pub const STRING_LITERAL: &str = "STRING_LITERAL";
    pub const QUOTE: &str = "QUOTE";
    pub const NUMBER: &str = "NUMBER";
    pub const KEYWORD: &str = "KEYWORD";
    pub const IDENTIFIER: &str = "IDENTIFIER";
    pub const OPERATOR: &str = "OPERATOR";
    pub const LPAR: &str = "LPAR";
    pub const RPAR: &str = "RPAR";
    pub const LBRACE: &str = "LBRACE";
    pub const RBRACE: &str = "RBRACE";
    pub const LBRACKET: &str = "LBRACKET";
    pub const RBRACKET: &str = "RBRACKET";
    pub const SEMICOLON: &str = "SEMICOLON";
    pub const COMMA: &str = "COMMA";

    pub const HTML_TAG: &str = "HTML_TAG";
    pub const XML_TAG: &str = "XML_TAG";
    pub const XML_START_TAG_START: &str = "XML_START_TAG_START";
    pub const XML_END_TAG_START: &str = "XML_END_TAG_START";
    pub const XML_TAG_END: &str = "XML_TAG_END";
    pub const XML_EMPTY_ELEMENT_END: &str = "XML_EMPTY_ELEMENT_END";
    pub const XML_NAME: &str = "XML_NAME";
    pub const XML_ATTRIBUTE: &str = "XML_ATTRIBUTE";
    pub const XML_EQ: &str = "XML_EQ";
    pub const XML_ATTRIBUTE_VALUE: &str = "XML_ATTRIBUTE_VALUE";
    pub const XML_ATTRIBUTE_VALUE_START_DELIMITER: &str = "XML_ATTRIBUTE_VALUE_START_DELIMITER";
    pub const XML_ATTRIBUTE_VALUE_TOKEN: &str = "XML_ATTRIBUTE_VALUE_TOKEN";
    pub const XML_ATTRIBUTE_VALUE_END_DELIMITER: &str = "XML_ATTRIBUTE_VALUE_END_DELIMITER";
    pub const XML_COMMENT: &str = "XML_COMMENT";
    pub const XML_COMMENT_START: &str = "XML_COMMENT_START";
    pub const XML_COMMENT_CHARACTERS: &str = "XML_COMMENT_CHARACTERS";
    pub const XML_COMMENT_END: &str = "XML_COMMENT_END";
    pub const XML_DOCTYPE: &str = "XML_DOCTYPE";
    pub const XML_DOCTYPE_START: &str = "XML_DOCTYPE_START";
    pub const XML_DOCTYPE_END: &str = "XML_DOCTYPE_END";
    pub const XML_TEXT: &str = "XML_TEXT";
    pub const XML_DATA_CHARACTERS: &str = "XML_DATA_CHARACTERS";

    pub const CODE_FENCE: &str = "CODE_FENCE";
    pub const CODE_FENCE_START: &str = "CODE_FENCE_START";
    pub const FENCE_LANG: &str = "FENCE_LANG";
    pub const CODE_FENCE_END: &str = "CODE_FENCE_END";
}

const KEYWORDS: &[&str] = &[
    "as", "break", "class", "const", "continue", "def", "do", "else", "enum", "export", "false",
    "fn", "for", "fun", "func", "function", "if", "impl", "import", "in", "interface", "let",
    "match", "mod", "new", "null", "package", "pub", "return", "self", "static", "struct",
    "super", "this", "trait", "true", "type", "use", "val", "var", "when", "where", "while",
    "yield",
];

type Input<'a> = LocatingSlice<&'a str>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Event {
    Open(&'static str, usize),
    Close(usize),
    Token(&'static str, Range<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    /// `//` and `/* */`
    Slashes,
    /// `#` to end of line
    Hash,
}

impl CommentStyle {
    fn for_language(language: &str) -> Self {
        match normalize_language_id(language).as_str() {
            "python" | "ruby" | "perl" | "shell_script" | "bash" | "sh" | "zsh" | "yaml"
            | "toml" | "r" | "makefile" | "dockerfile" | "elixir" | "coffeescript"
            | "properties" => CommentStyle::Hash,
            _ => CommentStyle::Slashes,
        }
    }

    fn starts_comment(self, text: &str) -> bool {
        match self {
            CommentStyle::Slashes => text.starts_with("//") || text.starts_with("/*"),
            CommentStyle::Hash => text.starts_with('#'),
        }
    }
}

pub(super) fn tokenize(text: &str, language: &str) -> Vec<Event> {
    let mut input = LocatingSlice::new(text);
    let mut events = Vec::new();

    if is_markup_language(language) {
        let tag_kind = match normalize_language_id(language).as_str() {
            "html" | "xhtml" => kind::HTML_TAG,
            _ => kind::XML_TAG,
        };
        markup(&mut input, &mut events, tag_kind);
    } else if normalize_language_id(language) == "markdown" {
        markdown(&mut input, &mut events, text);
    } else {
        code(&mut input, &mut events, CommentStyle::for_language(language));
    }
    events
}

// ===================
// Code
// ===================

fn code<'a>(input: &mut Input<'a>, events: &mut Vec<Event>, style: CommentStyle) {
    if let Ok(Some(range)) = opt(shebang).parse_next(input) {
        events.push(Event::Token(kind::SHEBANG, range));
    }

    while !input.is_empty() {
        let start = input.current_token_start();
        let token = match code_token(input, style) {
            Ok(token) => token,
            Err(_) => {
                input.next_token();
                kind::BAD_CHARACTER
            }
        };
        let end = input.current_token_start();
        events.push(Event::Token(token, start..end));
    }
}

fn code_token<'a>(input: &mut Input<'a>, style: CommentStyle) -> ModalResult<&'static str> {
    alt((
        whitespace,
        |input: &mut Input<'a>| comment(input, style),
        string,
        number,
        word,
        bracket,
        one_of(['"', '\'', '`']).value(kind::QUOTE),
        |input: &mut Input<'a>| operator(input, style),
        any.value(kind::BAD_CHARACTER),
    ))
    .parse_next(input)
}

fn shebang<'a>(input: &mut Input<'a>) -> ModalResult<Range<usize>> {
    ("#!", take_till(0.., '\n')).span().parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> ModalResult<&'static str> {
    take_while(1.., char::is_whitespace)
        .value(kind::WHITE_SPACE)
        .parse_next(input)
}

fn comment<'a>(input: &mut Input<'a>, style: CommentStyle) -> ModalResult<&'static str> {
    match style {
        CommentStyle::Slashes => alt((
            ("/**", not('/'), block_comment_rest).value(kind::DOC_COMMENT),
            ("/*", block_comment_rest).value(kind::BLOCK_COMMENT),
            ("//", take_till(0.., '\n')).value(kind::LINE_COMMENT),
        ))
        .parse_next(input),
        CommentStyle::Hash => ('#', take_till(0.., '\n'))
            .value(kind::LINE_COMMENT)
            .parse_next(input),
    }
}

/// Everything up to and including `*/`, or the rest of the text when the
/// comment is never closed.
fn block_comment_rest<'a>(input: &mut Input<'a>) -> ModalResult<()> {
    alt(((take_until(0.., "*/"), "*/").void(), rest.void())).parse_next(input)
}

/// A quoted literal closed on the same line (backtick literals may span
/// lines). An unclosed quote is left for the `QUOTE` token.
fn string<'a>(input: &mut Input<'a>) -> ModalResult<&'static str> {
    alt((
        ('"', |input: &mut Input<'a>| string_body(input, '"'), '"'),
        ('\'', |input: &mut Input<'a>| string_body(input, '\''), '\''),
        ('`', |input: &mut Input<'a>| string_body(input, '`'), '`'),
    ))
    .value(kind::STRING_LITERAL)
    .parse_next(input)
}

fn string_body<'a>(input: &mut Input<'a>, quote: char) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            take_while(1.., move |c: char| {
                c != quote && c != '\\' && (quote == '`' || c != '\n')
            })
            .void(),
            ('\\', any).void(),
        )),
    )
    .parse_next(input)
}

fn number<'a>(input: &mut Input<'a>) -> ModalResult<&'static str> {
    let digits = |c: char| c.is_ascii_digit();
    let suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';
    (
        one_of(digits),
        take_while(0.., suffix),
        opt(('.', take_while(1.., digits), take_while(0.., suffix))),
    )
        .value(kind::NUMBER)
        .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> ModalResult<&'static str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    )
        .take()
        .map(|word: &str| {
            if KEYWORDS.contains(&word) {
                kind::KEYWORD
            } else {
                kind::IDENTIFIER
            }
        })
        .parse_next(input)
}

fn bracket<'a>(input: &mut Input<'a>) -> ModalResult<&'static str> {
    one_of(['(', ')', '{', '}', '[', ']', ';', ','])
        .map(|c: char| match c {
            '(' => kind::LPAR,
            ')' => kind::RPAR,
            '{' => kind::LBRACE,
            '}' => kind::RBRACE,
            '[' => kind::LBRACKET,
            ']' => kind::RBRACKET,
            ';' => kind::SEMICOLON,
            _ => kind::COMMA,
        })
        .parse_next(input)
}

/// A run of symbol characters, stopping before a comment opener.
fn operator<'a>(input: &mut Input<'a>, style: CommentStyle) -> ModalResult<&'static str> {
    let remaining = input.peek_slice(input.eof_offset());
    let len = operator_len(remaining, style);
    if len == 0 {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    take(len).value(kind::OPERATOR).parse_next(input)
}

fn operator_len(text: &str, style: CommentStyle) -> usize {
    let mut len = 0;
    for (index, c) in text.char_indices() {
        if !is_operator_char(c) || (index > 0 && style.starts_comment(&text[index..])) {
            break;
        }
        len = index + c.len_utf8();
    }
    len
}

fn is_operator_char(c: char) -> bool {
    c.is_ascii_punctuation() && !matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '"' | '\'' | '`')
}

// ===================
// Markdown
// ===================

fn markdown<'a>(input: &mut Input<'a>, events: &mut Vec<Event>, text: &str) {
    let style = CommentStyle::for_language("markdown");
    let mut line_start = true;

    while !input.is_empty() {
        if line_start {
            let checkpoint = input.checkpoint();
            match code_fence(input) {
                Ok(mut fence) => {
                    events.append(&mut fence);
                    line_start = false;
                    continue;
                }
                Err(_) => input.reset(&checkpoint),
            }
        }

        let start = input.current_token_start();
        let token = match code_token(input, style) {
            Ok(token) => token,
            Err(_) => {
                input.next_token();
                kind::BAD_CHARACTER
            }
        };
        let end = input.current_token_start();
        events.push(Event::Token(token, start..end));
        line_start = text[..end].ends_with('\n');
    }
}

/// A fenced code block opened at the start of a line with three backticks
/// or three tildes. The body runs up to the first line that starts with the
/// same marker, or to the end of the text.
fn code_fence<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Event>> {
    let (marker, open) = alt(("```", "~~~")).with_span().parse_next(input)?;
    let mut events = vec![
        Event::Open(kind::CODE_FENCE, open.start),
        Event::Token(kind::CODE_FENCE_START, open),
    ];

    let (info, info_range) = take_till(0.., '\n').with_span().parse_next(input)?;
    events.push(Event::Token(kind::FENCE_LANG, info_range));
    if let Some(newline) = opt('\n'.span()).parse_next(input)? {
        events.push(Event::Token(kind::WHITE_SPACE, newline));
    }

    let body_start = input.current_token_start();
    let body_len = fence_body_len(input.peek_slice(input.eof_offset()), marker);
    let body = input.next_slice(body_len);
    let mut body_input = LocatingSlice::new(body);
    let mut body_events = Vec::new();
    code(&mut body_input, &mut body_events, CommentStyle::for_language(info.trim()));
    events.extend(body_events.into_iter().map(|event| shift(event, body_start)));

    if let Some(indent) = opt(take_while(1.., [' ', '\t']).span()).parse_next(input)? {
        events.push(Event::Token(kind::WHITE_SPACE, indent));
    }
    if let Some(close) = opt(literal(marker).span()).parse_next(input)? {
        events.push(Event::Token(kind::CODE_FENCE_END, close));
    }

    events.push(Event::Close(input.current_token_start()));
    Ok(events)
}

/// Byte length of a fence body: every line before the closing marker line.
fn fence_body_len(text: &str, marker: &str) -> usize {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_start_matches([' ', '\t']).starts_with(marker) {
            return offset;
        }
        offset += line.len();
    }
    offset
}

fn shift(event: Event, offset: usize) -> Event {
    match event {
        Event::Open(kind, start) => Event::Open(kind, start + offset),
        Event::Close(end) => Event::Close(end + offset),
        Event::Token(kind, range) => Event::Token(kind, range.start + offset..range.end + offset),
    }
}

// ===================
// Markup
// ===================

fn markup<'a>(input: &mut Input<'a>, events: &mut Vec<Event>, tag_kind: &'static str) {
    while !input.is_empty() {
        let construct = opt(alt((
            xml_comment,
            doctype,
            |input: &mut Input<'a>| tag(input, tag_kind),
        )))
        .parse_next(input);

        match construct {
            Ok(Some(mut parsed)) => events.append(&mut parsed),
            _ => text(input, events),
        }
    }
}

fn xml_comment<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Event>> {
    let (open, body, close) = (
        "<!--".span(),
        alt((take_until(0.., "-->"), rest)).span(),
        opt("-->").span(),
    )
        .parse_next(input)?;

    Ok(vec![
        Event::Open(kind::XML_COMMENT, open.start),
        Event::Token(kind::XML_COMMENT_START, open),
        Event::Token(kind::XML_COMMENT_CHARACTERS, body),
        Event::Token(kind::XML_COMMENT_END, close.clone()),
        Event::Close(close.end),
    ])
}

fn doctype<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Event>> {
    let open = literal(Caseless("<!DOCTYPE")).span().parse_next(input)?;
    let mut events = vec![
        Event::Open(kind::XML_DOCTYPE, open.start),
        Event::Token(kind::XML_DOCTYPE_START, open),
    ];

    loop {
        let piece = opt(alt((
            take_while(1.., char::is_whitespace).value(kind::WHITE_SPACE),
            '>'.value(kind::XML_DOCTYPE_END),
            quoted.value(kind::XML_ATTRIBUTE_VALUE_TOKEN),
            take_till(1.., |c: char| c.is_whitespace() || matches!(c, '>' | '"' | '\''))
                .value(kind::XML_NAME),
        ))
        .with_span())
        .parse_next(input)?;

        let Some((token, range)) = piece else {
            break;
        };
        events.push(Event::Token(token, range));
        if token == kind::XML_DOCTYPE_END {
            break;
        }
    }

    events.push(Event::Close(input.current_token_start()));
    Ok(events)
}

fn quoted<'a>(input: &mut Input<'a>) -> ModalResult<()> {
    alt((
        ('"', take_till(0.., '"'), opt('"')).void(),
        ('\'', take_till(0.., '\''), opt('\'')).void(),
    ))
    .parse_next(input)
}

fn tag<'a>(input: &mut Input<'a>, tag_kind: &'static str) -> ModalResult<Vec<Event>> {
    let start = input.current_token_start();
    let (open_kind, open) = alt((
        "</".value(kind::XML_END_TAG_START),
        "<".value(kind::XML_START_TAG_START),
    ))
    .with_span()
    .parse_next(input)?;
    let name = take_while(1.., is_name_char).span().parse_next(input)?;

    let mut events = vec![
        Event::Open(tag_kind, start),
        Event::Token(open_kind, open),
        Event::Token(kind::XML_NAME, name),
    ];

    loop {
        let piece = opt(alt((
            take_while(1.., char::is_whitespace)
                .span()
                .map(|range| vec![Event::Token(kind::WHITE_SPACE, range)]),
            alt((
                "/>".value(kind::XML_EMPTY_ELEMENT_END),
                ">".value(kind::XML_TAG_END),
            ))
            .with_span()
            .map(|(token, range)| vec![Event::Token(token, range)]),
            attribute,
        )))
        .parse_next(input)?;

        let Some(mut piece) = piece else {
            break;
        };
        let closed = matches!(
            piece.last(),
            Some(Event::Token(token, _)) if *token == kind::XML_TAG_END || *token == kind::XML_EMPTY_ELEMENT_END
        );
        events.append(&mut piece);
        if closed {
            break;
        }
    }

    events.push(Event::Close(input.current_token_start()));
    Ok(events)
}

fn attribute<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Event>> {
    let name = take_while(1.., is_name_char).span().parse_next(input)?;
    let mut events = vec![
        Event::Open(kind::XML_ATTRIBUTE, name.start),
        Event::Token(kind::XML_NAME, name),
    ];

    if let Some(eq) = opt('='.span()).parse_next(input)? {
        events.push(Event::Token(kind::XML_EQ, eq));
        if let Some(mut value) = opt(attribute_value).parse_next(input)? {
            events.append(&mut value);
        }
    }

    events.push(Event::Close(input.current_token_start()));
    Ok(events)
}

fn attribute_value<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Event>> {
    let start = input.current_token_start();
    let quote = opt(one_of(['"', '\''])).parse_next(input)?;
    let mut events = vec![Event::Open(kind::XML_ATTRIBUTE_VALUE, start)];

    match quote {
        Some(quote) => {
            events.push(Event::Token(
                kind::XML_ATTRIBUTE_VALUE_START_DELIMITER,
                start..start + 1,
            ));
            let body = take_till(0.., quote).span().parse_next(input)?;
            events.push(Event::Token(kind::XML_ATTRIBUTE_VALUE_TOKEN, body));
            if let Some(close) = opt(one_of(quote).span()).parse_next(input)? {
                events.push(Event::Token(kind::XML_ATTRIBUTE_VALUE_END_DELIMITER, close));
            }
        }
        None => {
            let body = take_till(1.., |c: char| c.is_whitespace() || c == '>')
                .span()
                .parse_next(input)?;
            events.push(Event::Token(kind::XML_ATTRIBUTE_VALUE_TOKEN, body));
        }
    }

    events.push(Event::Close(input.current_token_start()));
    Ok(events)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Text up to the next `<`. A `<` that opened nothing is text too.
fn text<'a>(input: &mut Input<'a>, events: &mut Vec<Event>) {
    events.push(Event::Open(kind::XML_TEXT, input.current_token_start()));

    if let Ok(range) = stray_open(input) {
        events.push(Event::Token(kind::XML_DATA_CHARACTERS, range));
    }
    while let Ok(event) = text_piece(input) {
        events.push(event);
    }

    events.push(Event::Close(input.current_token_start()));
}

fn stray_open<'a>(input: &mut Input<'a>) -> ModalResult<Range<usize>> {
    '<'.span().parse_next(input)
}

fn text_piece<'a>(input: &mut Input<'a>) -> ModalResult<Event> {
    alt((
        take_while(1.., char::is_whitespace)
            .span()
            .map(|range| Event::Token(kind::WHITE_SPACE, range)),
        take_till(1.., |c: char| c == '<' || c.is_whitespace())
            .span()
            .map(|range| Event::Token(kind::XML_DATA_CHARACTERS, range)),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str, language: &str) -> Vec<(&'static str, String)> {
        tokenize(text, language)
            .into_iter()
            .filter_map(|event| match event {
                Event::Token(token, range) if !range.is_empty() => Some((token, text[range].to_string())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokens("a /* b */ /** c */ // d", "kotlin"),
            [
                (kind::IDENTIFIER, "a".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::BLOCK_COMMENT, "/* b */".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::DOC_COMMENT, "/** c */".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::LINE_COMMENT, "// d".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_block_comment_is_not_doc() {
        assert_eq!(tokens("/**/", "kotlin"), [(kind::BLOCK_COMMENT, "/**/".to_string())]);
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(tokens("/* a\nb", "kotlin"), [(kind::BLOCK_COMMENT, "/* a\nb".to_string())]);
    }

    #[test]
    fn test_hash_comments() {
        assert_eq!(
            tokens("a // b # c", "Python"),
            [
                (kind::IDENTIFIER, "a".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::OPERATOR, "//".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::IDENTIFIER, "b".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::LINE_COMMENT, "# c".to_string()),
            ]
        );
    }

    #[test]
    fn test_shebang() {
        let tokens = tokens("#!/bin/sh\necho", "shell_script");
        assert_eq!(tokens[0], (kind::SHEBANG, "#!/bin/sh".to_string()));
    }

    #[test]
    fn test_operator_stops_before_comment() {
        assert_eq!(
            tokens("=>// x", "kotlin"),
            [(kind::OPERATOR, "=>".to_string()), (kind::LINE_COMMENT, "// x".to_string())]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokens(r#""a \" -> b" 'c'"#, "kotlin"),
            [
                (kind::STRING_LITERAL, r#""a \" -> b""#.to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::STRING_LITERAL, "'c'".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(
            tokens("\"a\nb", "kotlin"),
            [
                (kind::QUOTE, "\"".to_string()),
                (kind::IDENTIFIER, "a".to_string()),
                (kind::WHITE_SPACE, "\n".to_string()),
                (kind::IDENTIFIER, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("0xFF 1.5e3 1..2", "kotlin"),
            [
                (kind::NUMBER, "0xFF".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::NUMBER, "1.5e3".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::NUMBER, "1".to_string()),
                (kind::OPERATOR, "..".to_string()),
                (kind::NUMBER, "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_fence_events() {
        let events = tokenize("```python\na # b\n```", "markdown");
        assert_eq!(
            events,
            [
                Event::Open(kind::CODE_FENCE, 0),
                Event::Token(kind::CODE_FENCE_START, 0..3),
                Event::Token(kind::FENCE_LANG, 3..9),
                Event::Token(kind::WHITE_SPACE, 9..10),
                Event::Token(kind::IDENTIFIER, 10..11),
                Event::Token(kind::WHITE_SPACE, 11..12),
                Event::Token(kind::LINE_COMMENT, 12..15),
                Event::Token(kind::WHITE_SPACE, 15..16),
                Event::Token(kind::CODE_FENCE_END, 16..19),
                Event::Close(19),
            ]
        );
    }

    #[test]
    fn test_fence_only_opens_at_line_start() {
        assert_eq!(
            tokens("a ```b", "markdown"),
            [
                (kind::IDENTIFIER, "a".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::STRING_LITERAL, "``".to_string()),
                (kind::QUOTE, "`".to_string()),
                (kind::IDENTIFIER, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let events = tokenize("text\n~~~\n-> //", "markdown");
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Open(kind::CODE_FENCE, 5))).count(), 1);
        assert_eq!(events.last(), Some(&Event::Close(14)));
        assert!(!events.iter().any(|e| matches!(e, Event::Token(kind::CODE_FENCE_END, _))));
    }

    #[test]
    fn test_markup_events() {
        let events = tokenize("<br/>", "xml");
        assert_eq!(
            events,
            [
                Event::Open(kind::XML_TAG, 0),
                Event::Token(kind::XML_START_TAG_START, 0..1),
                Event::Token(kind::XML_NAME, 1..3),
                Event::Token(kind::XML_EMPTY_ELEMENT_END, 3..5),
                Event::Close(5),
            ]
        );
    }

    #[test]
    fn test_markup_comment_and_stray_bracket() {
        assert_eq!(
            tokens("<!-- x --> a < b", "html"),
            [
                (kind::XML_COMMENT_START, "<!--".to_string()),
                (kind::XML_COMMENT_CHARACTERS, " x ".to_string()),
                (kind::XML_COMMENT_END, "-->".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::XML_DATA_CHARACTERS, "a".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::XML_DATA_CHARACTERS, "<".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::XML_DATA_CHARACTERS, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_doctype() {
        assert_eq!(
            tokens("<!doctype html \"x\">", "html"),
            [
                (kind::XML_DOCTYPE_START, "<!doctype".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::XML_NAME, "html".to_string()),
                (kind::WHITE_SPACE, " ".to_string()),
                (kind::XML_ATTRIBUTE_VALUE_TOKEN, "\"x\"".to_string()),
                (kind::XML_DOCTYPE_END, ">".to_string()),
            ]
        );
    }
}
