//! Cross-operation conflict tracking.
//!
//! Nothing here rejects a statement: operations are applied in order by the
//! store, so overlapping writes are well defined. The tracker only records
//! which operations supersede earlier ones so callers can inspect or log it.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::CompileNote;
use crate::operation::{Operation, OperationKind};
use crate::path::DocumentPath;

#[derive(Default)]
pub(crate) struct ConflictTracker {
    /// Canonical path -> index of the last operation that replaced it
    last_write: HashMap<String, usize>,
    /// Paths a patch set to null, with the patch's index
    patched_nulls: Vec<(DocumentPath, usize)>,
    notes: Vec<CompileNote>,
}

impl ConflictTracker {
    pub fn record(&mut self, index: usize, operation: &Operation) {
        match operation {
            Operation::Patch { document } => self.record_patch(index, document),
            other => self.record_path_write(index, other.kind(), other.path()),
        }
    }

    fn record_path_write(&mut self, index: usize, kind: OperationKind, path: DocumentPath) {
        let key = path.to_string();

        let restores = match kind {
            OperationKind::Unset => None,
            _ => self.patched_null_covering(&path),
        };

        if let Some(patch_index) = restores {
            self.notes.push(CompileNote::RestoresPatchedNull {
                index,
                patch_index,
                path: path.clone(),
            });
        } else if replaces(kind) {
            if let Some(&earlier) = self.last_write.get(&key) {
                self.notes.push(CompileNote::Overrides {
                    index,
                    earlier,
                    path: path.clone(),
                });
            }
        }

        if replaces(kind) {
            self.patched_nulls.retain(|(nulled, _)| *nulled != path);
            self.last_write.insert(key, index);
        }
    }

    fn record_patch(&mut self, index: usize, document: &Map<String, Value>) {
        let mut leaves = Vec::new();
        collect_leaves(&DocumentPath::root(), document, &mut leaves);

        for (path, value) in leaves {
            let key = path.to_string();
            if let Some(&earlier) = self.last_write.get(&key) {
                self.notes.push(CompileNote::Overrides {
                    index,
                    earlier,
                    path: path.clone(),
                });
            }
            self.last_write.insert(key, index);

            self.patched_nulls.retain(|(nulled, _)| *nulled != path);
            if value.is_null() {
                self.patched_nulls.push((path, index));
            }
        }
    }

    /// Latest patch that nulled `path` or one of its ancestors.
    fn patched_null_covering(&self, path: &DocumentPath) -> Option<usize> {
        self.patched_nulls
            .iter()
            .rev()
            .find(|(nulled, _)| path.starts_with(nulled))
            .map(|(_, patch_index)| *patch_index)
    }

    pub fn into_notes(self) -> Vec<CompileNote> {
        self.notes
    }
}

/// Whether the operation replaces what is at its path, as opposed to
/// accumulating into it like the array operations.
fn replaces(kind: OperationKind) -> bool {
    matches!(
        kind,
        OperationKind::Set | OperationKind::Change | OperationKind::Unset
    )
}

/// Merge-patch recurses into nested objects, so its effective writes are the
/// non-object leaves.
fn collect_leaves<'a>(
    prefix: &DocumentPath,
    document: &'a Map<String, Value>,
    out: &mut Vec<(DocumentPath, &'a Value)>,
) {
    for (name, value) in document {
        let path = prefix.child_field(name.as_str());
        match value {
            Value::Object(nested) if !nested.is_empty() => collect_leaves(&path, nested, out),
            _ => out.push((path, value)),
        }
    }
}
