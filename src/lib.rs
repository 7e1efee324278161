//! docmod - submit document modify statements to a store
//!
//! Statements are built and compiled by `docmod-core`; this crate moves a
//! compiled statement to where it is applied:
//!
//! - **driver**: native binary protocol, `Transport` trait and TCP transport
//! - **local**: in-memory store applying statements atomically
//! - **cli**: JSON request files used by the `docmod` binary

pub mod cli;
pub mod driver;
pub mod local;

pub use docmod_core::{modify, CompiledStatement, ModifyError, ModifyStatement};
pub use driver::{DriverError, ExecuteStatement, StatementResult, TcpTransport, Transport};
pub use local::LocalStore;
