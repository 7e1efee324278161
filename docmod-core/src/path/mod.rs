//! Document paths.
//!
//! A [`DocumentPath`] addresses a value inside a JSON document as a chain of
//! field names and array indices. The empty path addresses the document
//! itself and is only accepted where the caller opts in
//! ([`DocumentPath::parse_allowing_root`]).
//!
//! # Syntax
//!
//! ```text
//! name
//! address.city
//! $.tags[0]
//! items[2].price
//! [0].id
//! `first name`
//! ```
//!
//! A leading `$` is optional. Indices are non-negative integers. Field names
//! that are not plain identifiers are written between backticks.

mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModifyError, ModifyResult};
use parser::PathParser;

/// One step of a document path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member access
    Field(String),
    /// Array element access
    Index(u32),
}

impl PathSegment {
    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }
}

/// Parsed, normalized document path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// The path addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path that must address something below the root.
    pub fn parse(text: &str) -> ModifyResult<Self> {
        let path = Self::parse_allowing_root(text)?;
        if path.is_root() {
            return Err(ModifyError::EmptyPathNotAllowed(format!("'{}'", text)));
        }
        Ok(path)
    }

    /// Parse a path, mapping the empty string and a bare `$` to the root.
    pub fn parse_allowing_root(text: &str) -> ModifyResult<Self> {
        let segments = PathParser::new(text)?.parse()?;
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Path of the containing value, `None` for the root.
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn ends_with_index(&self) -> bool {
        self.last().is_some_and(PathSegment::is_index)
    }

    /// True when `prefix` addresses this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &DocumentPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn child_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    pub fn child_index(&self, position: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(position));
        Self { segments }
    }
}

/// Identifiers the lexer reads without backticks.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) if is_plain_identifier(name) => write!(f, ".{}", name)?,
                PathSegment::Field(name) => write!(f, ".`{}`", name.replace('`', "``"))?,
                PathSegment::Index(position) => write!(f, "[{}]", position)?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for DocumentPath {
    type Err = ModifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_allowing_root(s)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = ModifyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_allowing_root(&value)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.to_string()
    }
}
