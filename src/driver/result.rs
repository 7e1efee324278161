//! Statement outcome reported by a transport

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::protocol::{DriverError, Response};

/// Outcome of executing a modify statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementResult {
    /// Number of documents the statement changed
    pub affected_items_count: u64,
    /// Identifiers generated by the store, if any
    #[serde(default)]
    pub generated_ids: Vec<String>,
    /// Warnings raised while applying the statement
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl StatementResult {
    pub fn affected(count: u64) -> Self {
        Self {
            affected_items_count: count,
            ..Default::default()
        }
    }

    /// Interpret a server response to a `modify` command.
    ///
    /// The affected count travels in `count`; generated ids and warnings in
    /// `data`.
    pub fn from_response(response: Response) -> Result<Self, DriverError> {
        match response {
            Response::Ok { data, count, .. } => {
                let mut result = Self::affected(count.unwrap_or(0) as u64);
                if let Some(data) = data {
                    result.generated_ids = string_list(&data, "generated_ids")?;
                    result.warnings = string_list(&data, "warnings")?;
                }
                Ok(result)
            }
            Response::Error { error } => Err(error),
            Response::Pong { .. } => Err(DriverError::ProtocolError(
                "Unexpected pong response to modify".to_string(),
            )),
        }
    }

    /// Encode as a server response; inverse of [`StatementResult::from_response`].
    pub fn into_response(self) -> Response {
        let data = if self.generated_ids.is_empty() && self.warnings.is_empty() {
            None
        } else {
            Some(json!({
                "generated_ids": self.generated_ids,
                "warnings": self.warnings,
            }))
        };
        Response::Ok {
            data,
            count: Some(self.affected_items_count as usize),
            tx_id: None,
        }
    }
}

fn string_list(data: &Value, key: &str) -> Result<Vec<String>, DriverError> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| DriverError::ProtocolError(format!("Invalid {}: {}", key, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_count_only() {
        let result = StatementResult::from_response(Response::ok_count(4)).unwrap();
        assert_eq!(result, StatementResult::affected(4));
    }

    #[test]
    fn test_from_empty_ok() {
        let result = StatementResult::from_response(Response::ok_empty()).unwrap();
        assert_eq!(result.affected_items_count, 0);
    }

    #[test]
    fn test_from_data() {
        let response = Response::Ok {
            data: Some(json!({"warnings": ["path missing"], "generated_ids": ["k1"]})),
            count: Some(1),
            tx_id: None,
        };
        let result = StatementResult::from_response(response).unwrap();
        assert_eq!(result.generated_ids, vec!["k1".to_string()]);
        assert_eq!(result.warnings, vec!["path missing".to_string()]);
    }

    #[test]
    fn test_error_is_propagated() {
        let err = DriverError::DatabaseError("Collection not found: users".to_string());
        assert_eq!(
            StatementResult::from_response(Response::error(err.clone())).unwrap_err(),
            err
        );
    }

    #[test]
    fn test_pong_is_protocol_error() {
        assert!(matches!(
            StatementResult::from_response(Response::pong()),
            Err(DriverError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_malformed_warnings() {
        let response = Response::Ok {
            data: Some(json!({"warnings": "not a list"})),
            count: Some(0),
            tx_id: None,
        };
        assert!(matches!(
            StatementResult::from_response(response),
            Err(DriverError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_response_round_trip() {
        let result = StatementResult {
            affected_items_count: 2,
            generated_ids: vec![],
            warnings: vec!["w".to_string()],
        };
        let back = StatementResult::from_response(result.clone().into_response()).unwrap();
        assert_eq!(back, result);
    }
}
