//! The JavaScript scanner.
//!
//! Converts source text into the coarse tokens the parser consumes. Decoded
//! string values and comment lists are allocated in the parse arena; every
//! other token value borrows the source text directly.

use crate::char_codes::*;
use crate::error::LexError;
use crate::source::TokenSource;
use bumpalo::Bump;
use docscan_ast::token::{Comment, CommentKind, Token, TokenFlags, TokenKind};
use docscan_core::text::{LineMap, Position, TextSpan};

const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "const", "continue", "debugger", "default", "do", "else",
    "finally", "for", "function", "if", "let", "return", "switch", "throw", "try", "var",
    "while", "with",
];

const WORD_OPERATORS: &[&str] = &["in", "instanceof", "typeof", "new", "void", "delete"];

const ATOMS: &[&str] = &["true", "false", "null", "undefined"];

/// Operator punctuation, longest first so the first prefix match wins.
const OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", ">>>", "<<=", ">>=", "**=", "==", "!=", "<=", ">=", "&&", "||", "++",
    "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "**", "=>", "=", "<", ">",
    "!", "~", "?", "+", "-", "*", "/", "%", "&", "|", "^",
];

/// The scanner converts JavaScript source text into tokens.
pub struct Scanner<'a> {
    arena: &'a Bump,
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    line_map: LineMap,
    /// Column cache: the last byte offset a column was computed for.
    column_line: u32,
    column_pos: usize,
    column: u32,
    /// Whether a `/` at this point starts a regular expression.
    regex_allowed: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source text.
    pub fn new(arena: &'a Bump, text: &'a str) -> Self {
        let mut scanner = Self {
            arena,
            text,
            pos: 0,
            line_map: LineMap::new(text),
            column_line: 0,
            column_pos: 0,
            column: 0,
            regex_allowed: true,
        };
        scanner.skip_shebang();
        scanner
    }

    /// Skip a shebang line at the very beginning of the file (e.g., `#!/usr/bin/env node`).
    fn skip_shebang(&mut self) {
        if self.text.starts_with("#!") {
            self.pos = 2;
            while let Some(ch) = self.current_char() {
                if is_line_break(ch) {
                    break;
                }
                self.pos += ch.len_utf8();
            }
        }
    }

    /// The full source text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token<'a>, LexError> {
        let (comments, line_break) = self.skip_trivia()?;
        let start = self.pos;

        let token = match self.current_char() {
            None => self.make(TokenKind::Eof, start),
            Some(ch) => match ch {
                '[' | ']' | '{' | '}' | '(' | ')' | ',' | ';' | ':' => {
                    self.pos += 1;
                    self.make(TokenKind::Punc, start)
                }
                '.' if self.char_at(1).map_or(false, is_digit) => self.scan_number(start),
                '.' => {
                    self.pos += 1;
                    self.make(TokenKind::Punc, start)
                }
                '\'' | '"' => self.scan_string_literal(ch, start)?,
                '0'..='9' => self.scan_number(start),
                '/' if self.regex_allowed => self.scan_regexp(start)?,
                _ if is_identifier_start(ch) => self.scan_identifier(start),
                _ => match OPERATORS.iter().find(|op| self.text[start..].starts_with(**op)) {
                    Some(op) => {
                        self.pos += op.len();
                        self.make(TokenKind::Operator, start)
                    }
                    None => {
                        return Err(LexError::InvalidCharacter {
                            ch,
                            span: TextSpan::new(start as u32, ch.len_utf8() as u32),
                            position: self.position_at(start),
                        })
                    }
                },
            },
        };

        self.regex_allowed = !ends_value(&token);

        let mut token = token.with_comments(comments);
        if line_break {
            token.flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        Ok(token)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.as_bytes().get(self.pos + offset).map(|&b| b as char)
    }

    /// Build a token spanning `start..self.pos` whose value is the source slice.
    fn make(&mut self, kind: TokenKind, start: usize) -> Token<'a> {
        let text = self.text;
        self.make_with_value(kind, start, &text[start..self.pos])
    }

    fn make_with_value(&mut self, kind: TokenKind, start: usize, value: &'a str) -> Token<'a> {
        let span = TextSpan::from_bounds(start as u32, self.pos as u32);
        Token::new(kind, value, span, self.position_at(start))
    }

    /// Line and character column of a byte offset. Offsets must be requested
    /// in non-decreasing order within a line.
    fn position_at(&mut self, offset: usize) -> Position {
        let line = self.line_map.line_of(offset as u32);
        if line != self.column_line || offset < self.column_pos {
            self.column_line = line;
            self.column_pos = self.line_map.line_start(line) as usize;
            self.column = 0;
        }
        self.column += self.text[self.column_pos..offset].chars().count() as u32;
        self.column_pos = offset;
        Position::new(line, self.column)
    }

    /// Skip whitespace and comments, returning the comments and whether a line
    /// break was crossed.
    fn skip_trivia(&mut self) -> Result<(&'a [Comment<'a>], bool), LexError> {
        let mut comments = bumpalo::collections::Vec::new_in(self.arena);
        let mut line_break = false;
        while let Some(ch) = self.current_char() {
            match ch {
                _ if is_line_break(ch) => {
                    line_break = true;
                    self.pos += ch.len_utf8();
                }
                _ if is_white_space_single_line(ch) => {
                    self.pos += ch.len_utf8();
                }
                '/' if self.char_at(1) == Some('/') => {
                    comments.push(self.scan_line_comment());
                }
                '/' if self.char_at(1) == Some('*') => {
                    let (comment, multi_line) = self.scan_block_comment()?;
                    line_break |= multi_line;
                    comments.push(comment);
                }
                _ => break,
            }
        }
        Ok((comments.into_bump_slice(), line_break))
    }

    fn scan_line_comment(&mut self) -> Comment<'a> {
        let text = self.text;
        let start = self.pos;
        let body = start + 2;
        let bytes = &text.as_bytes()[body..];
        let mut end = text.len();
        let mut offset = 0;
        while let Some(i) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[offset..]) {
            let at = body + offset + i;
            if bytes[offset + i] != 0xE2 || text[at..].starts_with(is_line_break) {
                end = at;
                break;
            }
            offset += i + 1;
        }
        self.pos = end;
        Comment {
            kind: CommentKind::Line,
            text: &text[body..end],
            span: TextSpan::from_bounds(start as u32, end as u32),
            position: self.position_at(start),
        }
    }

    /// Returns the comment and whether it contains a line break.
    fn scan_block_comment(&mut self) -> Result<(Comment<'a>, bool), LexError> {
        let source = self.text;
        let start = self.pos;
        let body = start + 2;
        let position = self.position_at(start);
        let Some(len) = memchr::memmem::find(&source.as_bytes()[body..], b"*/") else {
            return Err(LexError::UnterminatedComment {
                span: TextSpan::from_bounds(start as u32, source.len() as u32),
                position,
            });
        };
        let text = &source[body..body + len];
        self.pos = body + len + 2;
        let comment = Comment {
            kind: CommentKind::Block,
            text,
            span: TextSpan::from_bounds(start as u32, self.pos as u32),
            position,
        };
        Ok((comment, text.contains(is_line_break)))
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let word = &self.text[start..self.pos];
        let kind = if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else if WORD_OPERATORS.contains(&word) {
            TokenKind::Operator
        } else if ATOMS.contains(&word) {
            TokenKind::Atom
        } else {
            TokenKind::Name
        };
        self.make(kind, start)
    }

    fn scan_number(&mut self, start: usize) -> Token<'a> {
        let bytes = self.text.as_bytes();
        if bytes[start] == b'0' {
            if let Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B') = bytes.get(start + 1) {
                self.pos = start + 2;
                self.skip_while(|ch| is_hex_digit(ch) || ch == '_');
                return self.make(TokenKind::Number, start);
            }
        }

        self.skip_while(|ch| is_digit(ch) || ch == '_');
        if self.char_at(0) == Some('.') {
            self.pos += 1;
            self.skip_while(|ch| is_digit(ch) || ch == '_');
        }

        // Exponent
        if let Some('e' | 'E') = self.char_at(0) {
            let sign = matches!(self.char_at(1), Some('+' | '-')) as usize;
            if self.char_at(1 + sign).map_or(false, is_digit) {
                self.pos += 1 + sign;
                self.skip_while(is_digit);
            }
        }
        self.make(TokenKind::Number, start)
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.char_at(0) {
            if !predicate(ch) {
                break;
            }
            self.pos += 1;
        }
    }

    fn scan_string_literal(&mut self, quote: char, start: usize) -> Result<Token<'a>, LexError> {
        self.pos += 1; // skip opening quote
        let body = self.pos;
        // Decoded value; only materialized once an escape is seen.
        let mut decoded: Option<String> = None;
        loop {
            let Some(ch) = self.current_char() else {
                return Err(self.unterminated_string(start));
            };
            if ch == quote {
                break;
            }
            if is_line_break(ch) {
                return Err(self.unterminated_string(start));
            }
            if ch == '\\' {
                let out = decoded.get_or_insert_with(|| self.text[body..self.pos].to_string());
                self.pos += 1;
                let Some(escaped) = self.text[self.pos..].chars().next() else {
                    return Err(self.unterminated_string(start));
                };
                self.pos += escaped.len_utf8();
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' if !self.char_at(0).map_or(false, is_digit) => out.push('\0'),
                    'x' => {
                        let hex = read_hex(&self.text[self.pos..], 2);
                        push_code_point(out, hex, 'x');
                        if hex.is_some() {
                            self.pos += 2;
                        }
                    }
                    'u' => {
                        let rest = &self.text[self.pos..];
                        if rest.starts_with('{') {
                            let close = rest.find('}');
                            let value = close.and_then(|end| u32::from_str_radix(&rest[1..end], 16).ok());
                            push_code_point(out, value, 'u');
                            if let (Some(end), Some(_)) = (close, value) {
                                self.pos += end + 1;
                            }
                        } else {
                            let hex = read_hex(rest, 4);
                            push_code_point(out, hex, 'u');
                            if hex.is_some() {
                                self.pos += 4;
                            }
                        }
                    }
                    '\r' => {
                        // Line continuation
                        if self.char_at(0) == Some('\n') {
                            self.pos += 1;
                        }
                    }
                    c if is_line_break(c) => {}
                    c => out.push(c),
                }
                continue;
            }
            if let Some(out) = decoded.as_mut() {
                out.push(ch);
            }
            self.pos += ch.len_utf8();
        }
        let end_of_body = self.pos;
        self.pos += 1; // closing quote
        let value = match decoded {
            Some(value) => &*self.arena.alloc_str(&value),
            None => {
                let text = self.text;
                &text[body..end_of_body]
            }
        };
        Ok(self.make_with_value(TokenKind::String, start, value))
    }

    fn unterminated_string(&mut self, start: usize) -> LexError {
        LexError::UnterminatedString {
            span: TextSpan::from_bounds(start as u32, self.pos as u32),
            position: self.position_at(start),
        }
    }

    /// Scan a regular expression literal starting at the `/`.
    fn scan_regexp(&mut self, start: usize) -> Result<Token<'a>, LexError> {
        self.pos += 1;
        let mut in_character_class = false;
        loop {
            let Some(ch) = self.current_char() else {
                return Err(self.unterminated_regexp(start));
            };
            if is_line_break(ch) {
                return Err(self.unterminated_regexp(start));
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(next) = self.current_char() {
                        if is_line_break(next) {
                            return Err(self.unterminated_regexp(start));
                        }
                        self.pos += next.len_utf8();
                    }
                }
                '[' => in_character_class = true,
                ']' => in_character_class = false,
                '/' if !in_character_class => break,
                _ => {}
            }
        }
        // Flags
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        Ok(self.make(TokenKind::RegExp, start))
    }

    fn unterminated_regexp(&mut self, start: usize) -> LexError {
        LexError::UnterminatedRegExp {
            span: TextSpan::from_bounds(start as u32, self.pos as u32),
            position: self.position_at(start),
        }
    }
}

impl<'a> TokenSource<'a> for Scanner<'a> {
    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.scan()
    }
}

/// Whether a `/` directly after `token` is a division operator.
fn ends_value(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Name
        | TokenKind::Atom
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::RegExp => true,
        TokenKind::Punc => matches!(token.value, ")" | "]" | "}"),
        TokenKind::Operator => matches!(token.value, "++" | "--"),
        TokenKind::Keyword | TokenKind::Eof => false,
    }
}

fn read_hex(text: &str, digits: usize) -> Option<u32> {
    let hex = text.get(..digits)?;
    if !hex.chars().all(is_hex_digit) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Push a decoded escape, or the escape letter itself when malformed.
fn push_code_point(out: &mut String, value: Option<u32>, letter: char) {
    match value.and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => out.push(letter),
    }
}
