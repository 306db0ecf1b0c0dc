//! Fixbase core
//!
//! Shared value/record model and fixture-file discovery used by both the
//! relational (`fixbase-sql`) and document (`fixbase-mg`) store clients.

pub mod error;
pub mod fixture;
pub mod macros;
pub mod record;
pub mod value;

pub use error::*;
pub use fixture::*;
pub use record::*;
pub use value::*;
