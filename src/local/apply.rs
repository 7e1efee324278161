//! Path-addressed mutation primitives for JSON documents
//!
//! Every primitive is a no-op when the path does not resolve the way the
//! operation needs; none of them creates intermediate containers.

use docmod_core::{DocumentPath, Operation, PathSegment};
use serde_json::{Map, Value};

/// Get the value at `path`.
pub fn get_at_path<'a>(doc: &'a Value, path: &DocumentPath) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Field(name), Value::Object(map)) => map.get(name)?,
            (PathSegment::Index(i), Value::Array(items)) => items.get(*i as usize)?,
            _ => return None,
        };
    }
    Some(current)
}

fn navigate_mut<'a>(doc: &'a mut Value, segments: &[PathSegment]) -> Option<&'a mut Value> {
    let mut current = doc;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Field(name), Value::Object(map)) => map.get_mut(name)?,
            (PathSegment::Index(i), Value::Array(items)) => items.get_mut(*i as usize)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Parent container and final segment of a non-root path.
fn parent_mut<'a>(
    doc: &'a mut Value,
    path: &'a DocumentPath,
) -> Option<(&'a mut Value, &'a PathSegment)> {
    let (last, parents) = path.segments().split_last()?;
    navigate_mut(doc, parents).map(|parent| (parent, last))
}

/// Write `value` at `path`, creating the final member. Writing past the end
/// of an array appends.
pub fn set_at_path(doc: &mut Value, path: &DocumentPath, value: Value) -> bool {
    match parent_mut(doc, path) {
        Some((Value::Object(map), PathSegment::Field(name))) => {
            map.insert(name.clone(), value);
            true
        }
        Some((Value::Array(items), PathSegment::Index(i))) => {
            let i = *i as usize;
            if i < items.len() {
                items[i] = value;
            } else {
                items.push(value);
            }
            true
        }
        _ => false,
    }
}

/// Overwrite the value at `path` only if it exists.
pub fn replace_at_path(doc: &mut Value, path: &DocumentPath, value: Value) -> bool {
    if path.is_root() {
        return false;
    }
    match navigate_mut(doc, path.segments()) {
        Some(target) => {
            *target = value;
            true
        }
        None => false,
    }
}

/// Remove the member or element at `path`.
pub fn delete_at_path(doc: &mut Value, path: &DocumentPath) -> bool {
    match parent_mut(doc, path) {
        Some((Value::Object(map), PathSegment::Field(name))) => map.remove(name).is_some(),
        Some((Value::Array(items), PathSegment::Index(i))) => {
            let i = *i as usize;
            if i < items.len() {
                items.remove(i);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Insert into the array holding `path`'s final index, clamped to its length.
pub fn insert_at_path(doc: &mut Value, path: &DocumentPath, value: Value) -> bool {
    match parent_mut(doc, path) {
        Some((Value::Array(items), PathSegment::Index(i))) => {
            let at = (*i as usize).min(items.len());
            items.insert(at, value);
            true
        }
        _ => false,
    }
}

/// Push onto the array at `path`; any other existing value is wrapped
/// into `[old, value]`.
pub fn append_at_path(doc: &mut Value, path: &DocumentPath, value: Value) -> bool {
    match navigate_mut(doc, path.segments()) {
        Some(Value::Array(items)) => {
            items.push(value);
            true
        }
        Some(other) => {
            let old = other.take();
            *other = Value::Array(vec![old, value]);
            true
        }
        None => false,
    }
}

/// RFC 7396 JSON merge patch.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}

/// Apply one operation to a document. Returns whether the operation found
/// its target.
pub fn apply_operation(doc: &mut Value, operation: &Operation) -> bool {
    match operation {
        Operation::Set { path, value } => match value.as_json() {
            Some(json) => set_at_path(doc, path, json.clone()),
            None => delete_at_path(doc, path),
        },
        Operation::Change { path, value } => replace_at_path(doc, path, value.to_json()),
        Operation::Unset { path } => delete_at_path(doc, path),
        Operation::Patch { document } => {
            merge_patch(doc, &Value::Object(document.clone()));
            true
        }
        Operation::ArrayInsert { path, value } => insert_at_path(doc, path, value.to_json()),
        Operation::ArrayAppend { path, value } => append_at_path(doc, path, value.to_json()),
    }
}
