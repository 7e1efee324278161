//! Wire protocol definitions for the native driver
//!
//! Uses MessagePack for efficient binary serialization.

use docmod_core::{CompiledStatement, ModifyError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Magic header sent at the start of a driver connection
pub const DRIVER_MAGIC: &[u8] = b"docmod-drv-v1\0";

/// Maximum message size (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Driver protocol error types
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriverError {
    /// Connection or I/O error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// Protocol violation
    #[error("Protocol error: {0}")]
    ProtocolError(String),
    /// Database operation error
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Authentication error
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Message too large
    #[error("Message too large")]
    MessageTooLarge,
    /// Invalid command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    /// Statement failed to build, compile or validate
    #[error("Statement error: {0}")]
    StatementError(String),
}

impl From<ModifyError> for DriverError {
    fn from(err: ModifyError) -> Self {
        DriverError::StatementError(err.to_string())
    }
}

/// Commands that can be sent to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Authenticate with the server
    Auth {
        database: String,
        username: String,
        password: String,
    },

    /// Ping the server (keep-alive)
    Ping,

    /// Apply a compiled modify statement as one atomic update
    Modify {
        database: String,
        statement: CompiledStatement,
    },
}

/// Response from the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Success with optional data
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_id: Option<String>,
    },

    /// Error response
    Error { error: DriverError },

    /// Pong response (for Ping)
    Pong { timestamp: i64 },
}

impl Response {
    /// Create a success response with data
    pub fn ok(data: Value) -> Self {
        Response::Ok {
            data: Some(data),
            count: None,
            tx_id: None,
        }
    }

    /// Create a success response with count
    pub fn ok_count(count: usize) -> Self {
        Response::Ok {
            data: None,
            count: Some(count),
            tx_id: None,
        }
    }

    /// Create a success response with no data
    pub fn ok_empty() -> Self {
        Response::Ok {
            data: None,
            count: None,
            tx_id: None,
        }
    }

    /// Create an error response
    pub fn error(err: DriverError) -> Self {
        Response::Error { error: err }
    }

    /// Create a pong response
    pub fn pong() -> Self {
        Response::Pong {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Helper to encode a command with length prefix
/// Commands are sent from client to server
pub fn encode_command(cmd: &Command) -> Result<Vec<u8>, DriverError> {
    encode_message(cmd)
}

/// Helper to encode a response with length prefix
/// Responses are sent from server to client
pub fn encode_response(resp: &Response) -> Result<Vec<u8>, DriverError> {
    encode_message(resp)
}

/// Length-prefix a MessagePack payload
fn encode_message<T: Serialize>(msg: &T) -> Result<Vec<u8>, DriverError> {
    // Named serialization: tagged enums need string keys
    let payload = rmp_serde::to_vec_named(msg)
        .map_err(|e| DriverError::ProtocolError(format!("Serialization failed: {}", e)))?;

    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(DriverError::MessageTooLarge);
    }

    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Helper to decode a message from bytes
pub fn decode_message<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, DriverError> {
    rmp_serde::from_slice(data)
        .map_err(|e| DriverError::ProtocolError(format!("Deserialization failed: {}", e)))
}

/// Read one length-prefixed frame and return its payload
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, DriverError> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| DriverError::ConnectionError(format!("Read length failed: {}", e)))?;

    let msg_len = u32::from_be_bytes(len_buf) as usize;
    if msg_len > MAX_MESSAGE_SIZE {
        return Err(DriverError::MessageTooLarge);
    }

    let mut payload = vec![0u8; msg_len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| DriverError::ConnectionError(format!("Read payload failed: {}", e)))?;

    Ok(payload)
}
