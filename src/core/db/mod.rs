/// Database Module
///
/// This module provides the store access layer for TutorPal, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): the `Store` handle and the
///   `ScopedConnection` guard that brackets one logical unit of work
/// - **Query Execution** (`query.rs`): parameterized statements and cursor-style
///   result access inside a scope
/// - **Schema** (`schema.rs`): the fixed on-disk table layout
///
/// ## Error Handling
///
/// Storage failures surface as `TutorError::StoreUnavailable` and are never
/// swallowed by this layer.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
