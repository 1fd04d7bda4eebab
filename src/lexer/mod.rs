//! The lexer: converts a byte stream into tokens with exact spans.
//!
//! Single-threaded, synchronous, no buffering beyond the current cursor —
//! [`Lexer::save_state`]/[`Lexer::restore_state`] make re-scanning a plain
//! value copy, which is what the parser leans on for arrow-function and
//! destructuring-vs-block disambiguation.

mod error;
mod escape;

pub use error::LexError;

use log::trace;

use crate::position::Position;
use crate::token::{lookup_keyword, Token, TokenKind};

/// Constructor options for [`Lexer::with_options`].
#[derive(Debug, Clone, Default)]
pub struct LexerOptions {
    pub file: String,
}

/// An opaque snapshot of the lexer's cursor, returned by
/// [`Lexer::save_state`] and consumed by [`Lexer::restore_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pos: usize,
    line: usize,
    line_start: usize,
    last_significant: Option<TokenKind>,
}

pub struct Lexer<'a> {
    file: String,
    source: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    last_significant: Option<TokenKind>,
    shebang_checked: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    pub fn with_options(source: &'a str, options: LexerOptions) -> Self {
        Self {
            file: options.file,
            source,
            pos: 0,
            line: 0,
            line_start: 0,
            last_significant: None,
            shebang_checked: false,
        }
    }

    pub fn set_filename(&mut self, file: impl Into<String>) {
        self.file = file.into();
    }

    pub fn filename(&self) -> &str {
        &self.file
    }

    /// The current cursor position (between tokens).
    pub fn position(&self) -> Position {
        Position::new(self.file.clone(), self.pos, self.line_start, self.line, self.pos - self.line_start)
    }

    pub fn save_state(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
            last_significant: self.last_significant,
        }
    }

    pub fn restore_state(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.line_start = state.line_start;
        self.last_significant = state.last_significant;
    }

    /// Returns the source line containing `tok.start`, for caret-style
    /// diagnostic rendering. For an `EOF` immediately after a trailing
    /// newline, returns the previous non-empty line rather than `""`
    /// (resolved in SPEC_FULL.md §4, Open Question).
    pub fn get_line_text(&self, tok: &Token) -> &'a str {
        let mut line_start = tok.start.line_start_offset.min(self.source.len());
        let mut line_end = self.source[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(self.source.len());

        if line_start == line_end && line_start > 0 {
            let before = &self.source[..line_start.saturating_sub(1)];
            let prev_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
            line_start = prev_start;
            line_end = self.source[line_start..]
                .find('\n')
                .map(|i| line_start + i)
                .unwrap_or(before.len());
        }

        self.source[line_start..line_end].trim_end_matches('\r')
    }

    /// Produces the next token and advances the cursor. After `EOF` is
    /// produced, further calls keep producing `EOF` tokens without error.
    pub fn next(&mut self) -> (Token, Option<LexError>) {
        if !self.shebang_checked {
            self.shebang_checked = true;
            self.consume_shebang();
        }

        loop {
            if self.pos >= self.source.len() {
                let pos = self.position();
                return self.emit(TokenKind::Eof, "", pos.clone(), pos);
            }

            let rest = &self.source[self.pos..];
            let b = rest.as_bytes()[0];

            match b {
                b' ' | b'\t' | 0x0c => {
                    self.pos += 1;
                }
                b'\r' => {
                    let start = self.position();
                    let consumed = if rest.as_bytes().get(1) == Some(&b'\n') { "\r\n" } else { "\r" };
                    let len = consumed.len();
                    self.advance_line(len);
                    let end = self.position();
                    return self.emit(TokenKind::Newline, consumed, start, end);
                }
                b'\n' => {
                    let start = self.position();
                    self.advance_line(1);
                    let end = self.position();
                    return self.emit(TokenKind::Newline, "\n", start, end);
                }
                b'/' if rest.as_bytes().get(1) == Some(&b'/') => {
                    self.consume_line_comment();
                }
                b'/' if rest.as_bytes().get(1) == Some(&b'*') => {
                    self.consume_block_comment();
                }
                b'#' => {
                    let start = self.position();
                    self.pos += 1;
                    return self.error_token("unexpected character: '#'", start);
                }
                _ => break,
            }
        }

        let start = self.position();
        let c = self.source[self.pos..].chars().next().unwrap();

        if c == '_' || c.is_alphabetic() {
            return self.scan_ident_or_keyword(start);
        }
        if c.is_ascii_digit() {
            return self.scan_number(start);
        }
        match c {
            '"' | '\'' => self.scan_string(start, c),
            '`' => self.scan_template(start),
            _ => self.scan_operator(start),
        }
    }

    /// Drains `next()` to `EOF`, returning every token produced and every
    /// lexical error raised along the way. A convenience for tests and
    /// tooling; the parser itself only ever calls `next()`.
    pub fn tokenize_all(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            let (tok, err) = self.next();
            if let Some(err) = err {
                errors.push(err);
            }
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, errors)
    }

    fn emit(&mut self, kind: TokenKind, literal: impl Into<String>, start: Position, end: Position) -> (Token, Option<LexError>) {
        if kind != TokenKind::Newline {
            self.last_significant = Some(kind);
        }
        (Token::new(kind, literal, start, end), None)
    }

    fn error_token(&mut self, message: impl Into<String>, start: Position) -> (Token, Option<LexError>) {
        let message = message.into();
        trace!("lex error at {start}: {message}");
        let end = self.position();
        (
            Token::new(TokenKind::Illegal, "", start.clone(), end),
            Some(LexError::new(message, start)),
        )
    }

    fn advance_line(&mut self, n: usize) {
        self.pos += n;
        self.line += 1;
        self.line_start = self.pos;
    }

    fn consume_shebang(&mut self) {
        if self.source.starts_with("#!") {
            match self.source.find('\n') {
                Some(i) => self.pos = i,
                None => self.pos = self.source.len(),
            }
        }
    }

    fn consume_line_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.source.len() && self.source.as_bytes()[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn consume_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.source.len() {
            if self.source.as_bytes()[self.pos] == b'\n' {
                self.advance_line(1);
                continue;
            }
            if self.source[self.pos..].starts_with("*/") {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
        // unterminated block comment: consumed silently to EOF, no error.
    }

    fn scan_ident_or_keyword(&mut self, start: Position) -> (Token, Option<LexError>) {
        let begin = self.pos;
        for c in self.source[self.pos..].chars() {
            if c == '_' || c.is_alphanumeric() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.source[begin..self.pos];
        let end = self.position();

        // Non-ASCII identifiers may only contain code points with the
        // Letter property (ASCII letters/digits/underscore are unrestricted).
        if text.chars().any(|c| !c.is_ascii() && !c.is_alphabetic()) {
            return self.error_token(format!("invalid identifier: {text}"), start);
        }

        if text == "as" && self.last_significant == Some(TokenKind::Period) {
            return self.emit(TokenKind::Ident, text, start, end);
        }
        match lookup_keyword(text) {
            Some(kind) => self.emit(kind, text, start, end),
            None => self.emit(TokenKind::Ident, text, start, end),
        }
    }

    fn scan_number(&mut self, start: Position) -> (Token, Option<LexError>) {
        let begin = self.pos;
        let rest = &self.source[self.pos..];

        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            self.consume_while(|c| c.is_ascii_hexdigit());
            return self.finish_integer(start, begin, |digits| !digits.is_empty());
        }
        if rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            self.consume_while(|c| c == '0' || c == '1');
            return self.finish_integer(start, begin, |digits| !digits.is_empty());
        }

        self.consume_while(|c| c.is_ascii_digit());

        let next_is_decimal_point = self.source[self.pos..].starts_with('.')
            && self.source[self.pos + 1..].chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false);

        if next_is_decimal_point {
            self.pos += 1;
            self.consume_while(|c| c.is_ascii_digit());
            let tail_begin = self.pos;
            self.consume_while(|c| c.is_ascii_alphanumeric());
            let text = self.source[begin..self.pos].to_string();
            if self.pos != tail_begin {
                return self.error_token(format!("invalid decimal literal: {text}"), start);
            }
            let end = self.position();
            return self.emit(TokenKind::Float, text, start, end);
        }

        let tail_begin = self.pos;
        self.consume_while(|c| c.is_ascii_alphanumeric());
        let text = self.source[begin..self.pos].to_string();

        if self.pos != tail_begin {
            return self.error_token(format!("invalid decimal literal: {text}"), start);
        }

        if text == "0" {
            let end = self.position();
            return self.emit(TokenKind::Int, text, start, end);
        }
        if text.starts_with('0') && text.len() > 1 {
            if !text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                return self.error_token(format!("invalid decimal literal: {text}"), start);
            }
            let end = self.position();
            return self.emit(TokenKind::Int, text, start, end);
        }

        let end = self.position();
        self.emit(TokenKind::Int, text, start, end)
    }

    fn finish_integer(
        &mut self,
        start: Position,
        begin: usize,
        digits_ok: impl Fn(&str) -> bool,
    ) -> (Token, Option<LexError>) {
        let tail_begin = self.pos;
        self.consume_while(|c| c.is_ascii_alphanumeric());
        let text = self.source[begin..self.pos].to_string();
        if self.pos != tail_begin || !digits_ok(&text[2..]) {
            return self.error_token(format!("invalid decimal literal: {text}"), start);
        }
        let end = self.position();
        self.emit(TokenKind::Int, text, start, end)
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        for c in self.source[self.pos..].chars() {
            if pred(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, start: Position, quote: char) -> (Token, Option<LexError>) {
        self.pos += 1;
        let interior_begin = self.pos;
        let mut saw_escape = false;
        loop {
            match self.source[self.pos..].chars().next() {
                None => return self.error_token("unterminated string literal", start),
                Some('\n') => return self.error_token("unterminated string literal", start),
                Some('\\') => {
                    saw_escape = true;
                    self.pos += 1;
                    match self.source[self.pos..].chars().next() {
                        Some(c) => self.pos += c.len_utf8(),
                        None => return self.error_token("unterminated string literal", start),
                    }
                }
                Some(c) if c == quote => break,
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        let interior = self.source[interior_begin..self.pos].to_string();
        self.pos += 1; // closing quote

        let decoded = if saw_escape {
            match escape::decode_string_escapes(&interior) {
                Ok(s) => s,
                Err(msg) => return self.error_token(msg, start),
            }
        } else {
            interior
        };

        let end = self.position();
        self.emit(TokenKind::String, decoded, start, end)
    }

    fn scan_template(&mut self, start: Position) -> (Token, Option<LexError>) {
        let begin = self.pos;
        self.pos += 1;
        let mut interp_depth = 0usize;

        loop {
            match self.source[self.pos..].chars().next() {
                None => {
                    return self.error_token("unterminated template literal", start);
                }
                Some('\n') => self.advance_line(1),
                Some('\\') => {
                    self.pos += 1;
                    if let Some(c) = self.source[self.pos..].chars().next() {
                        self.pos += c.len_utf8();
                    }
                }
                Some('$') if self.source[self.pos + 1..].starts_with('{') => {
                    interp_depth += 1;
                    self.pos += 2;
                }
                Some('{') if interp_depth > 0 => {
                    interp_depth += 1;
                    self.pos += 1;
                }
                Some('}') if interp_depth > 0 => {
                    interp_depth -= 1;
                    self.pos += 1;
                }
                Some('`') if interp_depth == 0 => {
                    self.pos += 1;
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }

        let text = self.source[begin..self.pos].to_string();
        let end = self.position();
        self.emit(TokenKind::Template, text, start, end)
    }

    fn scan_operator(&mut self, start: Position) -> (Token, Option<LexError>) {
        use TokenKind::*;

        const THREE: &[(&str, TokenKind)] = &[("...", Spread)];
        const TWO: &[(&str, TokenKind)] = &[
            ("=>", Arrow),
            ("==", Eq),
            ("!=", NotEq),
            ("<=", LtEquals),
            (">=", GtEquals),
            ("<<", LtLt),
            (">>", GtGt),
            ("&&", And),
            ("||", Or),
            ("|>", PipeGt),
            ("?.", QuestionDot),
            ("??", Nullish),
            ("+=", PlusEquals),
            ("-=", MinusEquals),
            ("*=", AsteriskEquals),
            ("/=", SlashEquals),
            ("++", PlusPlus),
            ("--", MinusMinus),
            ("**", Pow),
        ];
        const ONE: &[(char, TokenKind)] = &[
            ('=', Assign),
            ('*', Asterisk),
            ('`', Backtick),
            ('!', Bang),
            (':', Colon),
            (',', Comma),
            ('>', Gt),
            ('{', LBrace),
            ('[', LBracket),
            ('(', LParen),
            ('<', Lt),
            ('-', Minus),
            ('%', Mod),
            ('|', Pipe),
            ('.', Period),
            ('+', Plus),
            ('&', Ampersand),
            ('?', Question),
            ('}', RBrace),
            (']', RBracket),
            (')', RParen),
            (';', Semicolon),
            ('/', Slash),
        ];

        let rest = &self.source[self.pos..];

        for (lit, kind) in THREE {
            if rest.starts_with(lit) {
                self.pos += lit.len();
                let end = self.position();
                return self.emit(*kind, *lit, start, end);
            }
        }
        // `....` lexes naturally as SPREAD (three dots matched above) followed
        // by a lone PERIOD on the next call.
        for (lit, kind) in TWO {
            if rest.starts_with(lit) {
                self.pos += lit.len();
                let end = self.position();
                return self.emit(*kind, *lit, start, end);
            }
        }
        if let Some(c) = rest.chars().next() {
            if let Some((_, kind)) = ONE.iter().find(|(ch, _)| *ch == c) {
                self.pos += c.len_utf8();
                let end = self.position();
                return self.emit(*kind, c.to_string(), start, end);
            }
            self.pos += c.len_utf8();
            return self.error_token(format!("unexpected character: '{c}'"), start);
        }
        let end = self.position();
        self.emit(TokenKind::Eof, "", start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(src).tokenize_all();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn basic_let_statement() {
        use TokenKind::*;
        assert_eq!(kinds("let x = 1 + 2"), vec![Let, Ident, Assign, Int, Plus, Int, Eof]);
    }

    #[test]
    fn shebang_then_newline_then_statement() {
        use TokenKind::*;
        let (tokens, errors) = Lexer::new("#!/bin/risor\n10;").tokenize_all();
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Newline, Int, Semicolon, Eof]);
    }

    #[test]
    fn decodes_escaped_string_literal() {
        let (tokens, errors) = Lexer::new(r#""\n\r\t\\\"""#).tokenize_all();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, "\n\r\t\\\"");
    }

    #[test]
    fn nullish_and_optional_chaining() {
        use TokenKind::*;
        assert_eq!(kinds("a?.b ?? c"), vec![Ident, QuestionDot, Ident, Nullish, Ident, Eof]);
    }

    #[test]
    fn as_after_period_is_plain_ident() {
        use TokenKind::*;
        assert_eq!(kinds("obj.as()"), vec![Ident, Period, Ident, LParen, RParen, Eof]);
    }

    #[test]
    fn spread_vs_double_period() {
        use TokenKind::*;
        assert_eq!(kinds("a...b"), vec![Ident, Spread, Ident, Eof]);
        assert_eq!(kinds("a..b"), vec![Ident, Period, Period, Ident, Eof]);
        assert_eq!(kinds("a....b"), vec![Ident, Spread, Period, Ident, Eof]);
    }

    #[test]
    fn hex_binary_octal_decimal_forms() {
        let (tokens, errors) = Lexer::new("0x1F 0b101 00 10").tokenize_all();
        assert!(errors.is_empty());
        let literals: Vec<_> = tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(literals, vec!["0x1F", "0b101", "00", "10", ""]);
    }

    #[test]
    fn non_ascii_letters_are_accepted_in_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("café"), vec![Ident, Eof]);
    }

    #[test]
    fn non_ascii_non_letter_code_point_is_an_invalid_identifier() {
        let (_, errors) = Lexer::new("a\u{0669}").tokenize_all(); // arabic-indic digit nine
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("invalid identifier"));
    }

    #[test]
    fn invalid_decimal_literal_is_an_error() {
        let (_, errors) = Lexer::new("4.f").tokenize_all();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("invalid decimal literal"));
    }

    #[test]
    fn unterminated_block_comment_reaches_eof_without_error() {
        let (tokens, errors) = Lexer::new("/* never closes").tokenize_all();
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (_, errors) = Lexer::new("\"abc").tokenize_all();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unterminated string"));
    }

    #[test]
    fn save_restore_state_replays_identically() {
        let mut lexer = Lexer::new("let x = 1");
        let before = lexer.save_state();
        let (first, _) = lexer.next();
        lexer.restore_state(before);
        let (replayed, _) = lexer.next();
        assert_eq!(first, replayed);
    }

    #[test]
    fn empty_source_is_a_single_eof() {
        let (tokens, errors) = Lexer::new("").tokenize_all();
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn whitespace_only_source_is_a_single_eof() {
        let (tokens, errors) = Lexer::new("   \t  ").tokenize_all();
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn template_literal_is_one_token_with_raw_interior() {
        let (tokens, errors) = Lexer::new("`hello ${name}!`").tokenize_all();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[0].literal, "`hello ${name}!`");
    }
}
