//! Tokenizer for the structured value text grammar

use crate::error::{Error, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Kinds of tokens produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    String(String),
    Number(f64),
    True,
    False,
    Null,
    Undefined,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftBrace => f.write_str("`{`"),
            TokenKind::RightBrace => f.write_str("`}`"),
            TokenKind::LeftBracket => f.write_str("`[`"),
            TokenKind::RightBracket => f.write_str("`]`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::String(_) => f.write_str("string"),
            TokenKind::Number(_) => f.write_str("number"),
            TokenKind::True => f.write_str("`true`"),
            TokenKind::False => f.write_str("`false`"),
            TokenKind::Null => f.write_str("`null`"),
            TokenKind::Undefined => f.write_str("`undefined`"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token and the byte offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Character-at-a-time tokenizer
///
/// Produces one token per call to [`Lexer::next_token`]; after the input is
/// exhausted every further call yields `Eof`.
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given text
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.chars.next();
        }
    }

    /// Read the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let offset = self.offset();
        let Some((_, c)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset,
            });
        };

        let kind = match c {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '"' => TokenKind::String(self.string(offset)?),
            '-' | '0'..='9' => TokenKind::Number(self.number(c, offset)?),
            't' => self.literal("true", TokenKind::True, offset)?,
            'f' => self.literal("false", TokenKind::False, offset)?,
            'n' => self.literal("null", TokenKind::Null, offset)?,
            'u' => self.literal("undefined", TokenKind::Undefined, offset)?,
            ch => return Err(Error::UnexpectedChar { ch, offset }),
        };
        Ok(Token { kind, offset })
    }

    /// Body of a string literal; the opening quote is already consumed.
    fn string(&mut self, start: usize) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(Error::UnterminatedString { offset: start }),
                Some((_, '"')) => return Ok(out),
                Some((_, '\\')) => match self.chars.next() {
                    None => return Err(Error::UnterminatedString { offset: start }),
                    Some((_, esc)) => match esc {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        // lenient: unknown escapes pass through verbatim
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    },
                },
                Some((_, ch)) => out.push(ch),
            }
        }
    }

    fn digits(&mut self) -> usize {
        let mut n = 0;
        while matches!(self.peek(), Some('0'..='9')) {
            self.chars.next();
            n += 1;
        }
        n
    }

    /// Number literal; `first` is already consumed.
    fn number(&mut self, first: char, start: usize) -> Result<f64> {
        let lead = if first == '-' {
            match self.chars.next() {
                Some((_, d @ '0'..='9')) => d,
                _ => return Err(Error::MalformedNumber { offset: start }),
            }
        } else {
            first
        };

        if lead == '0' {
            if matches!(self.peek(), Some('0'..='9')) {
                return Err(Error::LeadingZero { offset: start });
            }
        } else {
            self.digits();
        }

        if self.peek() == Some('.') {
            self.chars.next();
            if self.digits() == 0 {
                return Err(Error::MalformedNumber { offset: start });
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.chars.next();
            if matches!(self.peek(), Some('+' | '-')) {
                self.chars.next();
            }
            if self.digits() == 0 {
                return Err(Error::MalformedNumber { offset: start });
            }
        }

        // out-of-range literals like `1e400` parse to infinity, which has no text form
        let end = self.offset();
        self.src[start..end]
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(Error::MalformedNumber { offset: start })
    }

    /// Keyword literal; its first character is already consumed.
    fn literal(&mut self, word: &'static str, kind: TokenKind, offset: usize) -> Result<TokenKind> {
        for expected in word.chars().skip(1) {
            match self.chars.next() {
                Some((_, ch)) if ch == expected => {}
                _ => {
                    return Err(Error::BadLiteral {
                        expected: word,
                        offset,
                    })
                }
            }
        }
        Ok(kind)
    }
}
