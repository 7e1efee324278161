//! Tokenizer for document path expressions.

use crate::error::{ModifyError, ModifyResult};

#[derive(Debug, Clone, PartialEq)]
pub enum PathToken {
    /// Root marker `$`
    Dollar,
    /// Member separator `.`
    Dot,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// Plain or back-quoted field name
    Identifier(String),
    /// Unsigned decimal digits, kept raw so the parser can range-check them
    Integer(String),
    Eof,
}

pub struct PathLexer<'a> {
    source: &'a str,
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl<'a> PathLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let input: Vec<char> = source.chars().collect();
        let current_char = input.first().copied();

        Self {
            source,
            input,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn error(&self, message: impl std::fmt::Display) -> ModifyError {
        ModifyError::InvalidPathSyntax(format!(
            "{} at position {} in '{}'",
            message, self.position, self.source
        ))
    }

    fn read_identifier(&mut self) -> PathToken {
        let mut ident = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        PathToken::Identifier(ident)
    }

    fn read_quoted_identifier(&mut self) -> ModifyResult<PathToken> {
        let start = self.position;
        self.advance(); // Skip opening backtick

        let mut ident = String::new();

        while let Some(ch) = self.current_char {
            if ch == '`' {
                // A doubled backtick is a literal backtick
                if self.peek() == Some('`') {
                    ident.push('`');
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance();
                // Empty names are valid JSON keys
                return Ok(PathToken::Identifier(ident));
            }
            ident.push(ch);
            self.advance();
        }

        Err(ModifyError::InvalidPathSyntax(format!(
            "unterminated quoted field name starting at position {} in '{}'",
            start, self.source
        )))
    }

    fn read_integer(&mut self) -> PathToken {
        let mut digits = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        PathToken::Integer(digits)
    }

    /// Returns the next token together with the position it started at.
    pub fn next_token(&mut self) -> ModifyResult<(PathToken, usize)> {
        let start = self.position;

        let token = match self.current_char {
            None => PathToken::Eof,
            Some('$') => {
                self.advance();
                PathToken::Dollar
            }
            Some('.') => {
                self.advance();
                PathToken::Dot
            }
            Some('[') => {
                self.advance();
                PathToken::LeftBracket
            }
            Some(']') => {
                self.advance();
                PathToken::RightBracket
            }
            Some('`') => self.read_quoted_identifier()?,
            Some(ch) if ch.is_ascii_digit() => self.read_integer(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.read_identifier(),
            Some(ch) if ch.is_whitespace() => return Err(self.error("unexpected whitespace")),
            Some(ch) => return Err(self.error(format!("unexpected character '{}'", ch))),
        };

        Ok((token, start))
    }

    pub fn tokenize(&mut self) -> ModifyResult<Vec<(PathToken, usize)>> {
        let mut tokens = Vec::new();

        loop {
            let (token, position) = self.next_token()?;
            let is_eof = token == PathToken::Eof;
            tokens.push((token, position));
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }
}
