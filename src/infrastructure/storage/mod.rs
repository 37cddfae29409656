//! Relational storage: per-request SQLite connections, schema bootstrap and
//! the session table

mod schema;
mod session_store;
mod sqlite;

pub use schema::{initialize_schema, SCHEMA};
pub use session_store::{open_session_store, spawn_expired_session_cleanup};
pub use sqlite::{ConnectionScope, SqliteConfig};
