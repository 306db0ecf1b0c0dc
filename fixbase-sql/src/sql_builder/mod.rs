//! Sql Builder
//!
//! Statement text construction: `dialect.rs` categorizes database backends
//! and carries the per-backend SQL fragments, `stmt.rs` builds the DML/DDL
//! statements from records and condition pairs.

pub mod dialect;
pub mod stmt;

pub use dialect::SqlDialect;
