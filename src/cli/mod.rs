//! Statement request files for the `docmod` binary
//!
//! A request lists builder calls as JSON. It is replayed through
//! [`ModifyStatement`], so a request fails exactly where the equivalent
//! library calls would.
//!
//! ```json
//! {
//!   "collection": "users",
//!   "operations": [
//!     {"op": "set", "path": "name", "value": "Ann"},
//!     {"op": "unset", "paths": ["age"]},
//!     {"op": "array_append", "path": "tags", "value": "x"}
//!   ],
//!   "sort": ["name"],
//!   "limit": 5
//! }
//! ```

use docmod_core::{ModifyResult, ModifyStatement};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A modify statement described as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    pub operations: Vec<RequestOperation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// One builder call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RequestOperation {
    Set {
        path: String,
        #[serde(default)]
        value: Option<Value>,
    },
    Change {
        path: String,
        #[serde(default)]
        value: Option<Value>,
    },
    Unset {
        paths: Vec<String>,
    },
    /// `document` may be an object or a string holding serialized JSON
    Patch {
        document: Value,
    },
    ArrayInsert {
        path: String,
        #[serde(default)]
        value: Option<Value>,
    },
    ArrayAppend {
        path: String,
        #[serde(default)]
        value: Option<Value>,
    },
    Merge {
        document: Value,
    },
    ArrayDelete {
        path: String,
        position: i64,
    },
}

impl RequestOperation {
    /// Replay this call on `statement`.
    pub fn apply_to(&self, statement: &ModifyStatement) -> ModifyResult<ModifyStatement> {
        match self {
            RequestOperation::Set { path, value } => statement.set(path, value.clone()),
            RequestOperation::Change { path, value } => statement.change(path, value.clone()),
            RequestOperation::Unset { paths } => statement.unset(paths),
            RequestOperation::Patch { document } => match document {
                Value::String(text) => statement.patch_str(text),
                other => statement.patch(other.clone()),
            },
            RequestOperation::ArrayInsert { path, value } => {
                statement.array_insert(path, value.clone())
            }
            RequestOperation::ArrayAppend { path, value } => {
                statement.array_append(path, value.clone())
            }
            RequestOperation::Merge { document } => match document {
                Value::String(text) => statement.merge(text),
                other => statement.merge(&other.to_string()),
            },
            RequestOperation::ArrayDelete { path, position } => {
                statement.array_delete(path, *position)
            }
        }
    }
}

impl StatementRequest {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build the statement by replaying every call in order.
    pub fn into_statement(&self) -> ModifyResult<ModifyStatement> {
        let mut statement = ModifyStatement::new();
        if let Some(collection) = &self.collection {
            statement = statement.collection(collection.as_str());
        }
        for operation in &self.operations {
            statement = operation.apply_to(&statement)?;
        }
        if !self.sort.is_empty() {
            statement = statement.sort(&self.sort)?;
        }
        if let Some(limit) = self.limit {
            statement = statement.limit(limit)?;
        }
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmod_core::{ModifyError, Operation};
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let request = StatementRequest::from_json(
            r#"{"collection": "users", "operations": [{"op": "unset", "paths": ["a", "b"]}]}"#,
        )
        .unwrap();
        assert_eq!(request.collection.as_deref(), Some("users"));
        assert_eq!(
            request.operations,
            vec![RequestOperation::Unset {
                paths: vec!["a".to_string(), "b".to_string()]
            }]
        );
        assert!(request.sort.is_empty());
        assert_eq!(request.limit, None);
    }

    #[test]
    fn test_set_without_value_is_unset() {
        let request = StatementRequest::from_json(
            r#"{"operations": [{"op": "set", "path": "a"}, {"op": "set", "path": "b", "value": null}]}"#,
        )
        .unwrap();
        let stmt = request.into_statement().unwrap();
        assert!(stmt
            .operations()
            .iter()
            .all(|op| matches!(op, Operation::Unset { .. })));
    }

    #[test]
    fn test_patch_string_or_object() {
        let request = StatementRequest {
            collection: None,
            operations: vec![
                RequestOperation::Patch {
                    document: json!({"a": 1}),
                },
                RequestOperation::Patch {
                    document: json!("{\"b\": 2}"),
                },
            ],
            sort: vec![],
            limit: None,
        };
        let stmt = request.into_statement().unwrap();
        assert_eq!(stmt.len(), 2);
    }

    #[test]
    fn test_builder_errors_surface() {
        let request = StatementRequest {
            collection: None,
            operations: vec![RequestOperation::Merge {
                document: json!({"a": 1}),
            }],
            sort: vec![],
            limit: None,
        };
        assert!(matches!(
            request.into_statement(),
            Err(ModifyError::NotSupported(_))
        ));

        let request = StatementRequest {
            collection: None,
            operations: vec![RequestOperation::Set {
                path: "a".to_string(),
                value: Some(json!(1)),
            }],
            sort: vec![],
            limit: Some(-3),
        };
        assert_eq!(
            request.into_statement().unwrap_err(),
            ModifyError::InvalidLimit(-3)
        );
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(StatementRequest::from_json(r#"{"operations": [{"op": "rename"}]}"#).is_err());
    }
}
