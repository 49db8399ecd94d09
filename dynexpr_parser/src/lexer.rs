//! Lexer for expression strings
//!
//! Wraps the logos-generated lexer with string-literal scanning, so that
//! content inside quotes is never tokenized by the expression grammar.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

/// Expression lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    /// Offset from original source (used after restarting lexer)
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            offset: 0,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let start = self.offset + span.start;
        let end = self.offset + span.end;

        match result {
            Ok(Token::DoubleQuote) => {
                // Scan string content to find the closing quote, then restart
                // the lexer from after it.
                match self.scan_string_to_close(end) {
                    Ok(string_end) => {
                        self.restart_from(string_end);
                        let span = Span::new(start, string_end);
                        let text = &self.source[start..string_end];
                        Some(Ok(SpannedToken::new(Token::StringLiteral, span, text)))
                    }
                    Err(e) => {
                        self.restart_from(self.source.len());
                        Some(Err(e))
                    }
                }
            }

            Ok(token) => {
                let span = Span::new(start, end);
                let text = &self.source[start..end];
                Some(Ok(SpannedToken::new(token, span, text)))
            }

            Err(()) => Some(Err(ParseError::LexerError {
                span: Span::new(start, end),
            })),
        }
    }

    /// Scan string content to find the closing quote.
    /// Uses memchr to jump over runs of plain characters.
    fn scan_string_to_close(&self, start: usize) -> ParseResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr2(b'\\', b'"', &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    if bytes[pos] == b'\\' && pos + 1 < bytes.len() {
                        pos += 2;
                        continue;
                    }
                    if bytes[pos] == b'"' {
                        return Ok(pos + 1);
                    }
                    pos += 1;
                }
            }
        }

        Err(ParseError::UnterminatedString {
            span: Span::new(start - 1, pos),
        })
    }

    /// Restart the lexer from a new position
    fn restart_from(&mut self, pos: usize) {
        if pos < self.source.len() {
            self.inner = Token::lexer(&self.source[pos..]);
            self.offset = pos;
        } else {
            self.inner = Token::lexer("");
            self.offset = pos;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize source text into a vector of spanned tokens.
/// Fails on the first lexical error; the expression grammar has no
/// error recovery.
pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken<'_>>> {
    Lexer::new(source).collect()
}

/// Decode the escape sequences of a string literal body (quotes stripped)
pub fn unescape_string(raw: &str, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err(ParseError::InvalidEscape {
                sequence: "\\".to_string(),
                span,
            });
        };
        match esc {
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16).ok();
                match code.and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(ParseError::InvalidEscape {
                            sequence: format!("\\u{hex}"),
                            span,
                        })
                    }
                }
            }
            other => {
                return Err(ParseError::InvalidEscape {
                    sequence: format!("\\{other}"),
                    span,
                })
            }
        }
    }
    Ok(out)
}

/// Decode a character literal (quotes included, e.g. `'a'` or `'\n'`)
pub fn unescape_char(raw: &str, span: Span) -> ParseResult<char> {
    let body = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or(ParseError::InvalidCharacter { span })?;
    let decoded = unescape_string(body, span)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ParseError::InvalidCharacter { span }),
    }
}
