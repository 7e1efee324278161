//! Driver Protocol Tests
//!
//! Tests for the MessagePack-based driver protocol including:
//! - Command encoding/decoding
//! - Response handling
//! - Error handling

use docmod::driver::protocol::{
    decode_message, encode_command, encode_response, Command, DriverError, Response,
    DRIVER_MAGIC, MAX_MESSAGE_SIZE,
};
use docmod::driver::StatementResult;
use docmod_core::{modify, CompileNote, CompiledStatement};
use serde_json::json;

fn sample_statement() -> CompiledStatement {
    modify()
        .collection("users")
        .set("name", "Ann")
        .unwrap()
        .patch(json!({"name": null, "meta": {"seen": true}}))
        .unwrap()
        .change("name", "Bo")
        .unwrap()
        .array_insert("tags[0]", "first")
        .unwrap()
        .array_append("tags", json!({"k": [1, 2.5]}))
        .unwrap()
        .unset(["age"])
        .unwrap()
        .sort(["age desc", "name"])
        .unwrap()
        .limit(10)
        .unwrap()
        .compile()
        .unwrap()
}

// ============================================================================
// Command Serialization Tests
// ============================================================================

#[test]
fn test_command_modify() {
    let statement = sample_statement();
    let cmd = Command::Modify {
        database: "_system".to_string(),
        statement: statement.clone(),
    };

    let encoded = encode_command(&cmd).unwrap();
    let decoded: Command = decode_message(&encoded[4..]).unwrap();

    match decoded {
        Command::Modify {
            database,
            statement: decoded_statement,
        } => {
            assert_eq!(database, "_system");
            assert_eq!(decoded_statement, statement);
            assert!(!decoded_statement.notes().is_empty());
            assert!(decoded_statement.validate().is_ok());
        }
        _ => panic!("Expected Modify command"),
    }
}

#[test]
fn test_command_modify_keeps_notes() {
    let statement = sample_statement();
    assert!(statement
        .notes()
        .iter()
        .any(|note| matches!(note, CompileNote::RestoresPatchedNull { .. })));

    let encoded = encode_command(&Command::Modify {
        database: "db".to_string(),
        statement: statement.clone(),
    })
    .unwrap();
    let decoded: Command = decode_message(&encoded[4..]).unwrap();
    if let Command::Modify {
        statement: decoded, ..
    } = decoded
    {
        assert_eq!(decoded.notes(), statement.notes());
    }
}

#[test]
fn test_command_modify_with_empty_patch_key() {
    let statement = modify()
        .collection("users")
        .patch(json!({"": 1}))
        .unwrap()
        .patch(json!({"": 2}))
        .unwrap()
        .compile()
        .unwrap();
    assert_eq!(statement.notes().len(), 1);

    let encoded = encode_command(&Command::Modify {
        database: "db".to_string(),
        statement: statement.clone(),
    })
    .unwrap();
    match decode_message::<Command>(&encoded[4..]).unwrap() {
        Command::Modify {
            statement: decoded, ..
        } => assert_eq!(decoded, statement),
        _ => panic!("Expected Modify command"),
    }
}

#[test]
fn test_command_auth() {
    let cmd = Command::Auth {
        database: "_system".to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
    };

    let encoded = encode_command(&cmd).unwrap();
    let decoded: Command = decode_message(&encoded[4..]).unwrap();
    match decoded {
        Command::Auth {
            database,
            username,
            password,
        } => {
            assert_eq!(database, "_system");
            assert_eq!(username, "admin");
            assert_eq!(password, "secret");
        }
        _ => panic!("Expected Auth command"),
    }
}

#[test]
fn test_command_ping() {
    let encoded = encode_command(&Command::Ping).unwrap();
    let decoded: Command = decode_message(&encoded[4..]).unwrap();
    assert!(matches!(decoded, Command::Ping));
}

#[test]
fn test_length_prefix_matches_payload() {
    let encoded = encode_command(&Command::Ping).unwrap();
    let len = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) as usize;
    assert_eq!(len, encoded.len() - 4);
}

#[test]
fn test_command_uses_tagged_representation() {
    let value = serde_json::to_value(Command::Ping).unwrap();
    assert_eq!(value, json!({"cmd": "ping"}));
}

// ============================================================================
// Response Tests
// ============================================================================

#[test]
fn test_response_ok_count() {
    let encoded = encode_response(&Response::ok_count(7)).unwrap();
    let decoded: Response = decode_message(&encoded[4..]).unwrap();
    let result = StatementResult::from_response(decoded).unwrap();
    assert_eq!(result.affected_items_count, 7);
}

#[test]
fn test_response_error() {
    let resp = Response::error(DriverError::DatabaseError("Collection not found".to_string()));
    let encoded = encode_response(&resp).unwrap();
    let decoded: Response = decode_message(&encoded[4..]).unwrap();

    match decoded {
        Response::Error { error } => {
            assert_eq!(
                error,
                DriverError::DatabaseError("Collection not found".to_string())
            );
        }
        _ => panic!("Expected Error response"),
    }
}

#[test]
fn test_response_pong() {
    let encoded = encode_response(&Response::pong()).unwrap();
    let decoded: Response = decode_message(&encoded[4..]).unwrap();
    match decoded {
        Response::Pong { timestamp } => assert!(timestamp > 0),
        _ => panic!("Expected Pong response"),
    }
}

#[test]
fn test_response_ok_empty_serialization() {
    let value = serde_json::to_value(Response::ok_empty()).unwrap();
    assert_eq!(value, json!({"status": "ok"}));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_decode_garbage() {
    let result: Result<Command, _> = decode_message(&[0xc1, 0x00, 0xff]);
    assert!(matches!(result, Err(DriverError::ProtocolError(_))));
}

#[test]
fn test_decode_unknown_command() {
    let payload = rmp_serde::to_vec_named(&json!({"cmd": "drop_everything"})).unwrap();
    let result: Result<Command, _> = decode_message(&payload);
    assert!(matches!(result, Err(DriverError::ProtocolError(_))));
}

#[test]
fn test_oversized_message_rejected() {
    let big = "x".repeat(MAX_MESSAGE_SIZE + 1);
    let resp = Response::ok(json!(big));
    assert_eq!(
        encode_response(&resp).unwrap_err(),
        DriverError::MessageTooLarge
    );
}

#[test]
fn test_driver_error_display() {
    assert_eq!(
        DriverError::ConnectionError("refused".to_string()).to_string(),
        "Connection error: refused"
    );
    assert_eq!(DriverError::MessageTooLarge.to_string(), "Message too large");
    assert_eq!(
        DriverError::InvalidCommand("no collection".to_string()).to_string(),
        "Invalid command: no collection"
    );
}

#[test]
fn test_magic_header() {
    assert_eq!(DRIVER_MAGIC.len(), 14);
    assert_eq!(DRIVER_MAGIC.last(), Some(&0));
}
