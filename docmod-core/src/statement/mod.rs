//! Modify statement builder.
//!
//! [`ModifyStatement`] accumulates operations, sort expressions, a row limit
//! and a target collection. Every call returns a new statement and leaves the
//! receiver untouched, so statements derived from a common prefix are
//! independent of each other:
//!
//! ```rust
//! use docmod_core::modify;
//!
//! let base = modify().set("status", "active").unwrap();
//! let a = base.set("owner", "ann").unwrap();
//! let b = base.set("owner", "bob").unwrap();
//!
//! assert_eq!(base.len(), 1);
//! assert_eq!(a.len(), 2);
//! assert_eq!(b.len(), 2);
//! ```
//!
//! Path arguments are parsed at the call, so malformed paths fail there and
//! not at compile time.

mod sort;

pub use sort::SortField;

use std::sync::Arc;

use serde_json::Value;

use crate::compiler::{self, CompiledStatement};
use crate::error::{ModifyError, ModifyResult};
use crate::operation::{Operation, OperationKind};
use crate::path::DocumentPath;
use crate::value::DocValue;

/// Accumulated statement contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementState {
    pub operations: Vec<Operation>,
    pub sort: Vec<String>,
    pub limit: Option<u64>,
    pub collection: Option<String>,
}

/// Immutable, copy-on-write modify statement builder
#[derive(Debug, Clone, Default)]
pub struct ModifyStatement {
    state: Arc<StatementState>,
}

/// Parse a target path, naming the operation when the path is the root.
fn target_path(kind: OperationKind, text: &str) -> ModifyResult<DocumentPath> {
    DocumentPath::parse(text).map_err(|e| match e {
        ModifyError::EmptyPathNotAllowed(_) => ModifyError::EmptyPathNotAllowed(kind.to_string()),
        other => other,
    })
}

impl ModifyStatement {
    pub fn new() -> Self {
        Self::default()
    }

    fn derive(&self, update: impl FnOnce(&mut StatementState)) -> Self {
        let mut state = Arc::clone(&self.state);
        update(Arc::make_mut(&mut state));
        Self { state }
    }

    fn push(&self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.derive(|state| state.operations.extend(operations))
    }

    /// Target collection for transports. Last call wins.
    pub fn collection(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.derive(|state| state.collection = Some(name))
    }

    /// Replace the sort list. Each entry is `path [ASC|DESC]`.
    pub fn sort<I, S>(&self, fields: I) -> ModifyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sort = Vec::new();
        for field in fields {
            let expression = field.as_ref().trim();
            SortField::parse(expression)?;
            sort.push(expression.to_string());
        }
        Ok(self.derive(|state| state.sort = sort))
    }

    /// Replace the row limit.
    pub fn limit(&self, rows: i64) -> ModifyResult<Self> {
        let rows = u64::try_from(rows).map_err(|_| ModifyError::InvalidLimit(rows))?;
        Ok(self.derive(|state| state.limit = Some(rows)))
    }

    /// Set `path` to `value`. An absent or null value unsets the path.
    pub fn set(&self, path: &str, value: impl Into<DocValue>) -> ModifyResult<Self> {
        let path = target_path(OperationKind::Set, path)?;
        let operation = match value.into() {
            DocValue::Absent => Operation::Unset { path },
            value => Operation::Set { path, value },
        };
        Ok(self.push([operation]))
    }

    /// Replace the value at `path` only in documents where it exists.
    pub fn change(&self, path: &str, value: impl Into<DocValue>) -> ModifyResult<Self> {
        let path = target_path(OperationKind::Change, path)?;
        Ok(self.push([Operation::Change {
            path,
            value: value.into(),
        }]))
    }

    /// Remove each of `fields`, one operation per field, in order.
    pub fn unset<I, S>(&self, fields: I) -> ModifyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let operations = fields
            .into_iter()
            .map(|field| {
                target_path(OperationKind::Unset, field.as_ref()).map(|path| Operation::Unset { path })
            })
            .collect::<ModifyResult<Vec<_>>>()?;
        Ok(self.push(operations))
    }

    /// Merge-patch every matched document with `document`.
    pub fn patch(&self, document: Value) -> ModifyResult<Self> {
        match document {
            Value::Object(document) => Ok(self.push([Operation::Patch { document }])),
            other => Err(ModifyError::InvalidDocument(format!(
                "patch document must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Same as [`patch`](Self::patch), from serialized JSON text.
    pub fn patch_str(&self, document: &str) -> ModifyResult<Self> {
        let document: Value = serde_json::from_str(document)
            .map_err(|e| ModifyError::InvalidDocument(e.to_string()))?;
        self.patch(document)
    }

    /// Insert `value` into an array at the position named by the path's
    /// trailing index, e.g. `tags[0]`.
    pub fn array_insert(&self, field: &str, value: impl Into<DocValue>) -> ModifyResult<Self> {
        let path = target_path(OperationKind::ArrayInsert, field)?;
        if !path.ends_with_index() {
            return Err(ModifyError::InvalidPathSyntax(format!(
                "array insert path '{}' must end with an array index",
                field
            )));
        }
        let value = require_value(&path, value.into())?;
        Ok(self.push([Operation::ArrayInsert { path, value }]))
    }

    /// Append `value` to the array at `field`.
    pub fn array_append(&self, field: &str, value: impl Into<DocValue>) -> ModifyResult<Self> {
        let path = target_path(OperationKind::ArrayAppend, field)?;
        if path.ends_with_index() {
            return Err(ModifyError::InvalidPathSyntax(format!(
                "array append path '{}' must name an array, not an element",
                field
            )));
        }
        let value = require_value(&path, value.into())?;
        Ok(self.push([Operation::ArrayAppend { path, value }]))
    }

    /// Not supported.
    pub fn merge(&self, _document: &str) -> ModifyResult<Self> {
        Err(ModifyError::NotSupported("merge".to_string()))
    }

    /// Not supported.
    pub fn array_delete(&self, _field: &str, _position: i64) -> ModifyResult<Self> {
        Err(ModifyError::NotSupported("array_delete".to_string()))
    }

    /// Validate and lower the statement. The builder is left unchanged.
    pub fn compile(&self) -> ModifyResult<CompiledStatement> {
        compiler::compile(&self.state)
    }

    pub fn state(&self) -> &StatementState {
        &self.state
    }

    pub fn operations(&self) -> &[Operation] {
        &self.state.operations
    }

    pub fn sort_expressions(&self) -> &[String] {
        &self.state.sort
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.state.limit
    }

    pub fn target_collection(&self) -> Option<&str> {
        self.state.collection.as_deref()
    }

    pub fn len(&self) -> usize {
        self.state.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.operations.is_empty()
    }
}

fn require_value(path: &DocumentPath, value: DocValue) -> ModifyResult<DocValue> {
    if value.is_absent() {
        return Err(ModifyError::MissingValue(path.to_string()));
    }
    Ok(value)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
