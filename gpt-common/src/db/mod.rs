//! Database access: table layouts, the backend store and the in-memory raw tables

pub mod backup;
pub mod init;
pub mod raw_table;
pub mod schema;
pub mod store;

pub use backup::backup_tables;
pub use init::init_database;
pub use raw_table::{RawTable, Record, Tables, WriteKind, WriteOp};
pub use schema::{ColumnType, Row, TableDef, Value};
pub use store::{Backend, Store};
