//! In-memory document store that applies compiled modify statements
//!
//! Useful for tests and for the `docmod apply` command. Collections keep
//! their documents in insertion order.

pub mod apply;

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use docmod_core::{CompiledStatement, SortField};
use serde_json::{Map, Value};

use crate::driver::{DriverError, StatementResult, Transport};
use apply::{apply_operation, get_at_path};

/// Document identity field; a statement may not change it once set
pub const KEY_FIELD: &str = "_key";

/// In-memory collections of JSON documents
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    collections: HashMap<String, Vec<Value>>,
}

impl LocalStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a collection with documents
    pub fn add_collection(&mut self, name: &str, docs: Vec<Value>) {
        self.collections.insert(name.to_string(), docs);
    }

    /// Insert a single document, creating the collection if needed
    pub fn insert(&mut self, collection: &str, doc: Value) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    pub fn documents(&self, collection: &str) -> Option<&[Value]> {
        self.collections.get(collection).map(Vec::as_slice)
    }

    pub fn collection_exists(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Load from `{"collection": [documents], ...}`
    pub fn from_value(value: Value) -> Result<Self, DriverError> {
        let Value::Object(map) = value else {
            return Err(DriverError::InvalidCommand(
                "Store data must be an object of collections".to_string(),
            ));
        };

        let mut store = Self::new();
        for (name, docs) in map {
            match docs {
                Value::Array(docs) => store.add_collection(&name, docs),
                other => {
                    return Err(DriverError::InvalidCommand(format!(
                        "Collection '{}' must be an array, got {}",
                        name,
                        type_name(&other)
                    )))
                }
            }
        }
        Ok(store)
    }

    /// Dump as `{"collection": [documents], ...}`
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .collections
            .iter()
            .map(|(name, docs)| (name.clone(), Value::Array(docs.clone())))
            .collect();
        Value::Object(map)
    }

    /// Apply a compiled statement atomically.
    ///
    /// Every selected document is rewritten on a working copy first; the
    /// collection is only touched once all of them succeeded.
    pub fn apply(&mut self, statement: &CompiledStatement) -> Result<StatementResult, DriverError> {
        statement.validate()?;
        let sort_fields = statement.sort_fields()?;

        let name = statement.collection().ok_or_else(|| {
            DriverError::InvalidCommand("Modify statement has no target collection".to_string())
        })?;
        let docs = self
            .collections
            .get(name)
            .ok_or_else(|| DriverError::DatabaseError(format!("Collection not found: {}", name)))?;

        let selected = select(docs, &sort_fields, statement.limit());
        tracing::debug!(
            "Applying {} operations to {} of {} documents in '{}'",
            statement.operations().len(),
            selected.len(),
            docs.len(),
            name
        );

        let mut updates = Vec::new();
        let mut warnings = Vec::new();
        for position in selected {
            let original = &docs[position];
            let mut working = original.clone();

            for (index, operation) in statement.operations().iter().enumerate() {
                if !apply_operation(&mut working, operation) {
                    tracing::trace!(
                        "Operation #{} ({}) found no target in document {}",
                        index,
                        operation,
                        position
                    );
                    warnings.push(format!(
                        "operation #{} ({}) had no target in document {}",
                        index,
                        operation.kind(),
                        position
                    ));
                }
            }

            check_key_unchanged(original, &working)?;
            if &working != original {
                updates.push((position, working));
            }
        }

        let affected = updates.len() as u64;
        if let Some(docs) = self.collections.get_mut(name) {
            for (position, doc) in updates {
                docs[position] = doc;
            }
        }

        tracing::debug!("Modified {} documents in '{}'", affected, name);
        Ok(StatementResult {
            affected_items_count: affected,
            generated_ids: Vec::new(),
            warnings,
        })
    }
}

#[async_trait]
impl Transport for LocalStore {
    async fn submit(
        &mut self,
        statement: CompiledStatement,
    ) -> Result<StatementResult, DriverError> {
        self.apply(&statement)
    }
}

fn check_key_unchanged(original: &Value, updated: &Value) -> Result<(), DriverError> {
    match original.get(KEY_FIELD) {
        Some(key) if updated.get(KEY_FIELD) != Some(key) => Err(DriverError::DatabaseError(
            format!("Forbidden update of {} ({})", KEY_FIELD, key),
        )),
        _ => Ok(()),
    }
}

/// Positions of the documents a statement applies to, in application order.
fn select(docs: &[Value], sort_fields: &[SortField], limit: Option<u64>) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..docs.len()).collect();

    if !sort_fields.is_empty() {
        // Stable: ties keep insertion order
        positions.sort_by(|&a, &b| {
            for field in sort_fields {
                let left = get_at_path(&docs[a], &field.path).unwrap_or(&Value::Null);
                let right = get_at_path(&docs[b], &field.path).unwrap_or(&Value::Null);
                let ordering = compare_values(left, right);
                let ordering = if field.ascending {
                    ordering
                } else {
                    ordering.reverse()
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    if let Some(limit) = limit {
        positions.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    positions
}

/// Compare two JSON values for ordering.
///
/// Null < Bool < Number < String < Array < Object
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a_f64 = a.as_f64().unwrap_or(0.0);
            let b_f64 = b.as_f64().unwrap_or(0.0);
            a_f64.partial_cmp(&b_f64).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
