//! Fixbase SQL
//!
//! Relational-store client: a thin facade over `sqlx` that builds SQL
//! statements from structured inputs (ordered records and condition pairs)
//! and bulk-loads CSV fixture tables.

pub mod error;
pub mod fixtures;
pub mod sql_builder;
pub mod sql_executor;

pub use error::{CommonError, SqlError, SqlResult};
pub use sql_builder::{stmt, SqlDialect};
pub use sql_executor::{SqlConnInfo, SqlEngine, SqlExecutor};
