//! Value payloads carried by operations.
//!
//! Builder arguments are normalized once, at the call site: JSON `null` and a
//! missing value both become [`DocValue::Absent`], everything else is kept as
//! a `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModifyError, ModifyResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<Value>")]
pub enum DocValue {
    #[default]
    Absent,
    Json(Value),
}

impl DocValue {
    /// Parse a serialized JSON document or scalar.
    pub fn parse(text: &str) -> ModifyResult<Self> {
        serde_json::from_str::<Value>(text)
            .map(DocValue::from)
            .map_err(|e| ModifyError::InvalidDocument(format!("{}", e)))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DocValue::Absent)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DocValue::Absent => None,
            DocValue::Json(value) => Some(value),
        }
    }

    /// The value as stored in a document; absent becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            DocValue::Absent => Value::Null,
            DocValue::Json(value) => value.clone(),
        }
    }
}

impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocValue::Absent,
            other => DocValue::Json(other),
        }
    }
}

impl From<Option<Value>> for DocValue {
    fn from(value: Option<Value>) -> Self {
        value.map(DocValue::from).unwrap_or(DocValue::Absent)
    }
}

impl From<DocValue> for Option<Value> {
    fn from(value: DocValue) -> Self {
        match value {
            DocValue::Absent => None,
            DocValue::Json(value) => Some(value),
        }
    }
}

impl From<&DocValue> for DocValue {
    fn from(value: &DocValue) -> Self {
        value.clone()
    }
}

macro_rules! doc_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DocValue {
                fn from(value: $ty) -> Self {
                    DocValue::from(Value::from(value))
                }
            }

            impl From<Option<$ty>> for DocValue {
                fn from(value: Option<$ty>) -> Self {
                    value.map(DocValue::from).unwrap_or(DocValue::Absent)
                }
            }
        )*
    };
}

doc_value_from!(bool, i32, i64, u32, u64, f64, String, &str);

impl<T: Into<Value>> From<Vec<T>> for DocValue {
    fn from(values: Vec<T>) -> Self {
        DocValue::Json(Value::Array(values.into_iter().map(Into::into).collect()))
    }
}

impl From<serde_json::Map<String, Value>> for DocValue {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        DocValue::Json(Value::Object(map))
    }
}
