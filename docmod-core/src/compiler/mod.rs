//! Statement compiler.
//!
//! Lowers a [`StatementState`] into a [`CompiledStatement`]: the operations
//! exactly as appended, plus sort, limit and target collection. Compilation
//! validates every operation and records cross-operation notes but never
//! drops, merges or reorders operations. The store applies them in order.

mod conflicts;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModifyError, ModifyResult};
use crate::operation::Operation;
use crate::path::DocumentPath;
use crate::statement::{SortField, StatementState};
use conflicts::ConflictTracker;

/// Non-fatal observation made while compiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "note", rename_all = "snake_case")]
pub enum CompileNote {
    /// Operation `index` replaces what operation `earlier` wrote at `path`
    Overrides {
        index: usize,
        earlier: usize,
        path: DocumentPath,
    },
    /// Operation `index` writes at or below a path the patch at
    /// `patch_index` set to null
    RestoresPatchedNull {
        index: usize,
        patch_index: usize,
        path: DocumentPath,
    },
}

impl fmt::Display for CompileNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileNote::Overrides {
                index,
                earlier,
                path,
            } => write!(
                f,
                "operation #{} overrides operation #{} at {}",
                index, earlier, path
            ),
            CompileNote::RestoresPatchedNull {
                index,
                patch_index,
                path,
            } => write!(
                f,
                "operation #{} writes {} after patch #{} removed it",
                index, path, patch_index
            ),
        }
    }
}

/// Validated, order-preserving statement ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledStatement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<String>,
    operations: Vec<Operation>,
    #[serde(default)]
    sort: Vec<String>,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<CompileNote>,
}

impl CompiledStatement {
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn sort(&self) -> &[String] {
        &self.sort
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn notes(&self) -> &[CompileNote] {
        &self.notes
    }

    /// Parsed sort list.
    pub fn sort_fields(&self) -> ModifyResult<Vec<SortField>> {
        self.sort.iter().map(|s| SortField::parse(s)).collect()
    }

    /// Re-check a statement that did not come straight from [`compile`],
    /// e.g. one decoded off the wire.
    pub fn validate(&self) -> ModifyResult<()> {
        if self.operations.is_empty() {
            return Err(ModifyError::EmptyStatement);
        }
        for operation in &self.operations {
            validate_operation(operation)?;
        }
        self.sort_fields()?;
        Ok(())
    }
}

/// Checks that only need the operation itself.
pub fn validate_operation(operation: &Operation) -> ModifyResult<()> {
    let kind = operation.kind();

    if let Operation::Patch { .. } = operation {
        return Ok(());
    }

    let path = operation.path();
    if path.is_root() {
        return Err(ModifyError::EmptyPathNotAllowed(kind.to_string()));
    }

    match operation {
        Operation::ArrayInsert { value, .. } => {
            if !path.ends_with_index() {
                return Err(ModifyError::InvalidPathSyntax(format!(
                    "array insert path '{}' must end with an array index",
                    path
                )));
            }
            if value.is_absent() {
                return Err(ModifyError::MissingValue(path.to_string()));
            }
        }
        Operation::ArrayAppend { value, .. } => {
            if path.ends_with_index() {
                return Err(ModifyError::InvalidPathSyntax(format!(
                    "array append path '{}' must name an array, not an element",
                    path
                )));
            }
            if value.is_absent() {
                return Err(ModifyError::MissingValue(path.to_string()));
            }
        }
        _ => {}
    }

    Ok(())
}

/// Compile `state`. Either the full statement is produced or an error is
/// returned; `state` is never modified.
pub fn compile(state: &StatementState) -> ModifyResult<CompiledStatement> {
    if state.operations.is_empty() {
        return Err(ModifyError::EmptyStatement);
    }

    let mut tracker = ConflictTracker::default();
    for (index, operation) in state.operations.iter().enumerate() {
        validate_operation(operation)?;
        tracing::trace!("Operation #{}: {}", index, operation);
        tracker.record(index, operation);
    }

    for expression in &state.sort {
        SortField::parse(expression)?;
    }

    let notes = tracker.into_notes();
    for note in &notes {
        tracing::debug!("Compile note: {}", note);
    }

    tracing::debug!(
        "Compiled modify statement: {} operations, sort {:?}, limit {:?}",
        state.operations.len(),
        state.sort,
        state.limit
    );

    Ok(CompiledStatement {
        collection: state.collection.clone(),
        operations: state.operations.clone(),
        sort: state.sort.clone(),
        limit: state.limit,
        notes,
    })
}
