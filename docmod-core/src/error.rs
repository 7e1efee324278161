//! Error types for docmod-core.
//!
//! Every error is raised by the builder call or compile step that detects it.

use thiserror::Error;

/// Statement building and compilation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifyError {
    #[error("Invalid path syntax: {0}")]
    InvalidPathSyntax(String),

    #[error("Empty path not allowed for {0}")]
    EmptyPathNotAllowed(String),

    #[error("Invalid limit: {0} (must be non-negative)")]
    InvalidLimit(i64),

    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Statement has no operations")]
    EmptyStatement,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for statement operations
pub type ModifyResult<T> = Result<T, ModifyError>;

impl serde::Serialize for ModifyError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
