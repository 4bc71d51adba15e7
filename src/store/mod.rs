//! Persistence layer: a libSQL-backed key-value record store.

pub mod libsql_backend;
pub mod migrations;
pub mod records;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use records::{ExportBundle, Records, record_keys};
pub use traits::RecordStore;
