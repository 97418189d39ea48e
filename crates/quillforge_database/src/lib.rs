//! PostgreSQL persistence for the Quillforge content engine.
//!
//! Diesel-backed implementations of the engine's storage seams:
//! [`PostgresContentStore`] for revision lineages and edit records, and
//! [`PostgresUsageStore`] for metered usage. Enum columns are stored as
//! snake_case text; the edit append runs as one transaction with a
//! conditional update on the current pointer.
//!
//! # Example
//!
//! ```rust,ignore
//! use quillforge_database::{PostgresContentStore, establish_connection};
//!
//! let conn = establish_connection()?;
//! let store = PostgresContentStore::new(conn);
//! ```

#![forbid(unsafe_code)]

mod connection;
mod content_store;
mod models;
mod usage_store;

pub mod schema;

pub use connection::establish_connection;
pub use content_store::PostgresContentStore;
pub use models::{
    ContentRevisionRow, EditRecordRow, NewContentRevisionRow, NewEditRecordRow, UsageEntryRow,
};
pub use usage_store::PostgresUsageStore;
