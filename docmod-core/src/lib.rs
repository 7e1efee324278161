//! docmod-core - Storage-independent document modification statements.
//!
//! This crate builds and compiles modify statements: ordered lists of
//! path-addressed mutations against JSON documents, with optional sort and
//! limit modifiers. It performs no I/O; a compiled statement is handed to a
//! transport that applies it atomically.
//!
//! # Main Components
//!
//! - **Path**: Parses document path expressions (`a.b[0]`) into segments
//! - **Operation**: One mutation bound to its path and value
//! - **Statement**: Immutable, copy-on-write builder
//! - **Compiler**: Validates the statement and lowers it for transport
//!
//! # Example
//!
//! ```rust
//! use docmod_core::{modify, Operation};
//!
//! let compiled = modify()
//!     .set("name", "Ann").unwrap()
//!     .unset(["age"]).unwrap()
//!     .array_append("tags", "x").unwrap()
//!     .sort(["name"]).unwrap()
//!     .limit(5).unwrap()
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(compiled.operations().len(), 3);
//! assert!(matches!(compiled.operations()[1], Operation::Unset { .. }));
//! assert_eq!(compiled.sort(), &["name".to_string()]);
//! assert_eq!(compiled.limit(), Some(5));
//! ```

pub mod compiler;
pub mod error;
pub mod operation;
pub mod path;
pub mod statement;
pub mod value;

// Re-export main types for convenience
pub use compiler::{compile, CompileNote, CompiledStatement};
pub use error::{ModifyError, ModifyResult};
pub use operation::{Operation, OperationKind};
pub use path::{DocumentPath, PathSegment};
pub use statement::{ModifyStatement, SortField, StatementState};
pub use value::DocValue;

/// Start an empty modify statement.
pub fn modify() -> ModifyStatement {
    ModifyStatement::new()
}
