//! Native driver module for submitting modify statements
//!
//! A compiled statement travels to the store as one `modify` command, so
//! the whole operation list is applied atomically on the server side.
//!
//! # Protocol Overview
//!
//! The driver protocol uses a simple framed message format:
//! - **Magic Header**: `docmod-drv-v1` (14 bytes, sent once on connection)
//! - **Request Frame**: `[length: 4 bytes BE][msgpack payload]`
//! - **Response Frame**: `[length: 4 bytes BE][msgpack payload]`

pub mod protocol;
pub mod result;
pub mod tcp;
pub mod transport;

pub use protocol::{
    decode_message, encode_command, encode_response, read_frame, Command, DriverError, Response,
    DRIVER_MAGIC, MAX_MESSAGE_SIZE,
};
pub use result::StatementResult;
pub use tcp::TcpTransport;
pub use transport::{ExecuteStatement, Transport};
