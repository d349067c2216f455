//! The engine agnostic data access contract.
//!
//! Application code talks to a [`Database`] through a [`Connection`]; engines
//! implement [`Database`] and live in their own crates.

/// The access contract implemented by storage engines.
pub mod backend;
/// Shared, serialized access to an engine.
pub mod connection;
/// Database errors.
pub mod error;
/// Bound parameters and query results.
pub mod query;
/// Logical data types.
pub mod types;
mod unimplemented;
/// Values and rows written to an engine.
pub mod values;

#[doc(inline)]
pub use self::backend::{ensure_connected, Database};
#[doc(inline)]
pub use self::connection::{Connection, Session};
#[doc(inline)]
pub use self::error::{Error, ErrorKind, QueryResult};
#[doc(inline)]
pub use self::query::{Bind, Binds, ResultSet};
#[doc(inline)]
pub use self::types::DataType;
#[doc(inline)]
pub use self::unimplemented::Unimplemented;
#[doc(inline)]
pub use self::values::{Row, Value};
