//! Native driver transport over TCP
//!
//! # Example
//!
//! ```rust,no_run
//! use docmod::driver::{ExecuteStatement, TcpTransport};
//! use docmod_core::modify;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut transport = TcpTransport::connect("localhost:6745", "mydb").await?;
//!     transport.auth("admin", "password").await?;
//!
//!     let result = modify()
//!         .collection("users")
//!         .set("name", "Ann")?
//!         .execute(&mut transport)
//!         .await?;
//!
//!     println!("Modified {} documents", result.affected_items_count);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use docmod_core::CompiledStatement;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::protocol::{
    decode_message, encode_command, read_frame, Command, DriverError, Response, DRIVER_MAGIC,
};
use super::result::StatementResult;
use super::transport::Transport;

/// Single-connection transport speaking the native driver protocol
pub struct TcpTransport {
    stream: TcpStream,
    database: String,
}

impl TcpTransport {
    /// Connect to a server and select `database` for subsequent statements
    ///
    /// # Arguments
    /// * `addr` - Server address (e.g., "localhost:6745")
    /// * `database` - Database the statements run against
    pub async fn connect(addr: &str, database: &str) -> Result<Self, DriverError> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            DriverError::ConnectionError(format!("Failed to connect to {}: {}", addr, e))
        })?;

        let mut transport = Self {
            stream,
            database: database.to_string(),
        };

        // Send magic header
        transport.stream.write_all(DRIVER_MAGIC).await.map_err(|e| {
            DriverError::ConnectionError(format!("Failed to send magic header: {}", e))
        })?;
        transport
            .stream
            .flush()
            .await
            .map_err(|e| DriverError::ConnectionError(format!("Failed to flush: {}", e)))?;

        tracing::info!("Connected to {} (database '{}')", addr, database);
        Ok(transport)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Send a command and receive the response
    async fn send_command(&mut self, command: Command) -> Result<Response, DriverError> {
        let data = encode_command(&command)?;
        self.stream
            .write_all(&data)
            .await
            .map_err(|e| DriverError::ConnectionError(format!("Write failed: {}", e)))?;
        self.stream
            .flush()
            .await
            .map_err(|e| DriverError::ConnectionError(format!("Flush failed: {}", e)))?;

        let payload = read_frame(&mut self.stream).await?;
        decode_message(&payload)
    }

    /// Ping the server
    pub async fn ping(&mut self) -> Result<i64, DriverError> {
        let response = self.send_command(Command::Ping).await?;
        match response {
            Response::Pong { timestamp } => Ok(timestamp),
            Response::Error { error } => Err(error),
            _ => Err(DriverError::ProtocolError(
                "Expected pong response".to_string(),
            )),
        }
    }

    /// Authenticate against the selected database
    pub async fn auth(&mut self, username: &str, password: &str) -> Result<(), DriverError> {
        let response = self
            .send_command(Command::Auth {
                database: self.database.clone(),
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        match response {
            Response::Ok { .. } => {
                tracing::debug!("Authenticated as '{}'", username);
                Ok(())
            }
            Response::Error { error } => Err(error),
            _ => Err(DriverError::ProtocolError("Unexpected response".to_string())),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn submit(
        &mut self,
        statement: CompiledStatement,
    ) -> Result<StatementResult, DriverError> {
        if statement.collection().is_none() {
            return Err(DriverError::InvalidCommand(
                "Modify statement has no target collection".to_string(),
            ));
        }

        tracing::debug!(
            "Submitting modify statement with {} operations to '{}'",
            statement.operations().len(),
            self.database
        );

        let response = self
            .send_command(Command::Modify {
                database: self.database.clone(),
                statement,
            })
            .await?;
        StatementResult::from_response(response)
    }
}
