//! Recursive descent parser for document path expressions.
//!
//! ```text
//! path    := ['$' ['.']] segment ( '.' segment | index )*
//! segment := ident index* | index+
//! index   := '[' digits ']'
//! ```

use super::lexer::{PathLexer, PathToken};
use super::PathSegment;
use crate::error::{ModifyError, ModifyResult};

pub struct PathParser<'a> {
    source: &'a str,
    tokens: Vec<(PathToken, usize)>,
    index: usize,
}

impl<'a> PathParser<'a> {
    pub fn new(source: &'a str) -> ModifyResult<Self> {
        let tokens = PathLexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            index: 0,
        })
    }

    fn current(&self) -> &PathToken {
        // tokenize() always terminates the list with Eof
        &self.tokens[self.index.min(self.tokens.len() - 1)].0
    }

    fn position(&self) -> usize {
        self.tokens[self.index.min(self.tokens.len() - 1)].1
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    fn error(&self, expected: &str) -> ModifyError {
        let found = match self.current() {
            PathToken::Dollar => "'$'".to_string(),
            PathToken::Dot => "'.'".to_string(),
            PathToken::LeftBracket => "'['".to_string(),
            PathToken::RightBracket => "']'".to_string(),
            PathToken::Identifier(name) => format!("field '{}'", name),
            PathToken::Integer(digits) => format!("number {}", digits),
            PathToken::Eof => "end of path".to_string(),
        };
        ModifyError::InvalidPathSyntax(format!(
            "expected {} but found {} at position {} in '{}'",
            expected,
            found,
            self.position(),
            self.source
        ))
    }

    /// Parse the whole input. An empty segment list means the root document.
    pub fn parse(mut self) -> ModifyResult<Vec<PathSegment>> {
        let mut segments = Vec::new();

        if *self.current() == PathToken::Dollar {
            self.advance();
            match self.current() {
                PathToken::Eof => return Ok(segments),
                PathToken::Dot => {
                    self.advance();
                    self.parse_member(&mut segments)?;
                }
                PathToken::LeftBracket => segments.push(self.parse_index()?),
                _ => return Err(self.error("'.' or '[' after '$'")),
            }
        } else {
            match self.current() {
                PathToken::Eof => return Ok(segments),
                PathToken::LeftBracket => segments.push(self.parse_index()?),
                _ => self.parse_member(&mut segments)?,
            }
        }

        loop {
            match self.current() {
                PathToken::Eof => break,
                PathToken::LeftBracket => segments.push(self.parse_index()?),
                PathToken::Dot => {
                    self.advance();
                    self.parse_member(&mut segments)?;
                }
                _ => return Err(self.error("'.', '[' or end of path")),
            }
        }

        Ok(segments)
    }

    /// A segment after a separator: a field name or a bare index.
    fn parse_member(&mut self, segments: &mut Vec<PathSegment>) -> ModifyResult<()> {
        match self.current().clone() {
            PathToken::Identifier(name) => {
                self.advance();
                segments.push(PathSegment::Field(name));
                Ok(())
            }
            PathToken::LeftBracket => {
                segments.push(self.parse_index()?);
                Ok(())
            }
            _ => Err(self.error("field name")),
        }
    }

    fn parse_index(&mut self) -> ModifyResult<PathSegment> {
        if *self.current() != PathToken::LeftBracket {
            return Err(self.error("'['"));
        }
        self.advance();

        let position = match self.current() {
            PathToken::Integer(digits) => digits.parse::<u32>().map_err(|_| {
                ModifyError::InvalidPathSyntax(format!(
                    "array index {} out of range at position {} in '{}'",
                    digits,
                    self.position(),
                    self.source
                ))
            })?,
            _ => return Err(self.error("array index")),
        };
        self.advance();

        if *self.current() != PathToken::RightBracket {
            return Err(self.error("']'"));
        }
        self.advance();

        Ok(PathSegment::Index(position))
    }
}
