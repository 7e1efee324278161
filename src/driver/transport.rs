//! Executor boundary: hand a compiled statement to something that applies it

use async_trait::async_trait;
use docmod_core::{CompiledStatement, ModifyStatement};

use super::protocol::DriverError;
use super::result::StatementResult;

/// Applies compiled modify statements
#[async_trait]
pub trait Transport: Send {
    /// Apply `statement` as one atomic update.
    async fn submit(&mut self, statement: CompiledStatement)
        -> Result<StatementResult, DriverError>;
}

/// Compile-and-submit in one call
#[async_trait]
pub trait ExecuteStatement {
    async fn execute<T>(&self, transport: &mut T) -> Result<StatementResult, DriverError>
    where
        T: Transport + ?Sized;
}

#[async_trait]
impl ExecuteStatement for ModifyStatement {
    async fn execute<T>(&self, transport: &mut T) -> Result<StatementResult, DriverError>
    where
        T: Transport + ?Sized,
    {
        let compiled = self.compile()?;
        transport.submit(compiled).await
    }
}
