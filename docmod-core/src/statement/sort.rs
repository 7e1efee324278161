//! Sort expressions: `path [ASC|DESC]`.

use std::fmt;

use crate::error::{ModifyError, ModifyResult};
use crate::path::DocumentPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub path: DocumentPath,
    /// true = ascending
    pub ascending: bool,
}

impl SortField {
    pub fn parse(expression: &str) -> ModifyResult<Self> {
        let (path_text, rest) = split_path(expression.trim_start());
        if path_text.is_empty() {
            return Err(ModifyError::InvalidPathSyntax(
                "empty sort expression".to_string(),
            ));
        }
        let path = DocumentPath::parse(path_text)?;

        let mut parts = rest.split_whitespace();

        let ascending = match parts.next() {
            None => true,
            Some(direction) if direction.eq_ignore_ascii_case("asc") => true,
            Some(direction) if direction.eq_ignore_ascii_case("desc") => false,
            Some(other) => {
                return Err(ModifyError::InvalidPathSyntax(format!(
                    "invalid sort direction '{}' in '{}'",
                    other, expression
                )))
            }
        };

        if let Some(extra) = parts.next() {
            return Err(ModifyError::InvalidPathSyntax(format!(
                "unexpected '{}' in sort expression '{}'",
                extra, expression
            )));
        }

        Ok(Self { path, ascending })
    }
}

/// Split at the first whitespace outside a back-quoted field name.
fn split_path(expression: &str) -> (&str, &str) {
    let mut quoted = false;
    for (at, ch) in expression.char_indices() {
        match ch {
            '`' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => return expression.split_at(at),
            _ => {}
        }
    }
    (expression, "")
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{} DESC", self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions() {
        let field = SortField::parse("name").unwrap();
        assert!(field.ascending);
        assert_eq!(field.path.to_string(), "$.name");

        assert!(SortField::parse("age asc").unwrap().ascending);
        assert!(!SortField::parse("age DESC").unwrap().ascending);
        assert!(!SortField::parse("  stats.score   desc ").unwrap().ascending);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "   ", "a..b", "age sideways", "age desc extra", "$"] {
            assert!(SortField::parse(bad).is_err(), "{:?} should fail", bad);
        }
        assert!(matches!(
            SortField::parse("$"),
            Err(ModifyError::EmptyPathNotAllowed(_))
        ));
    }

    #[test]
    fn test_quoted_field_with_space() {
        let field = SortField::parse("`first name` desc").unwrap();
        assert!(!field.ascending);
        assert_eq!(field.path.to_string(), "$.`first name`");

        let field = SortField::parse("  a.`x ``y`` z`[2]").unwrap();
        assert!(field.ascending);
        assert_eq!(field.path.to_string(), "$.a.`x ``y`` z`[2]");

        assert!(SortField::parse("`first name").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(SortField::parse("a.b desc").unwrap().to_string(), "$.a.b DESC");
        assert_eq!(SortField::parse("a").unwrap().to_string(), "$.a");
    }
}
