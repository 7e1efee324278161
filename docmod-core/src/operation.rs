//! Operation records.
//!
//! One [`Operation`] is one mutation bound to its parsed target path and its
//! normalized payload. Records are immutable once appended to a statement.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::DocumentPath;
use crate::value::DocValue;

/// Kind of mutation, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Set,
    Change,
    Unset,
    Patch,
    ArrayInsert,
    ArrayAppend,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Set => "set",
            OperationKind::Change => "change",
            OperationKind::Unset => "unset",
            OperationKind::Patch => "patch",
            OperationKind::ArrayInsert => "array_insert",
            OperationKind::ArrayAppend => "array_append",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single document mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create or replace the value at `path`
    Set {
        path: DocumentPath,
        #[serde(default)]
        value: DocValue,
    },

    /// Replace the value at `path` only where it already exists
    Change {
        path: DocumentPath,
        #[serde(default)]
        value: DocValue,
    },

    /// Remove the value at `path`
    Unset { path: DocumentPath },

    /// Merge-patch the whole document
    Patch { document: Map<String, Value> },

    /// Insert into an array before the indexed element
    ArrayInsert {
        path: DocumentPath,
        #[serde(default)]
        value: DocValue,
    },

    /// Append to the array at `path`
    ArrayAppend {
        path: DocumentPath,
        #[serde(default)]
        value: DocValue,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Set { .. } => OperationKind::Set,
            Operation::Change { .. } => OperationKind::Change,
            Operation::Unset { .. } => OperationKind::Unset,
            Operation::Patch { .. } => OperationKind::Patch,
            Operation::ArrayInsert { .. } => OperationKind::ArrayInsert,
            Operation::ArrayAppend { .. } => OperationKind::ArrayAppend,
        }
    }

    /// Target path; patches address the root.
    pub fn path(&self) -> DocumentPath {
        match self {
            Operation::Set { path, .. }
            | Operation::Change { path, .. }
            | Operation::Unset { path }
            | Operation::ArrayInsert { path, .. }
            | Operation::ArrayAppend { path, .. } => path.clone(),
            Operation::Patch { .. } => DocumentPath::root(),
        }
    }

    pub fn value(&self) -> Option<&DocValue> {
        match self {
            Operation::Set { value, .. }
            | Operation::Change { value, .. }
            | Operation::ArrayInsert { value, .. }
            | Operation::ArrayAppend { value, .. } => Some(value),
            Operation::Unset { .. } | Operation::Patch { .. } => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Unset { path } => write!(f, "unset({})", path),
            Operation::Patch { document } => {
                write!(f, "patch({})", Value::Object(document.clone()))
            }
            other => {
                let value = other.value().map(DocValue::to_json).unwrap_or(Value::Null);
                write!(f, "{}({}, {})", other.kind(), other.path(), value)
            }
        }
    }
}
