//! Fixbase MongoDB
//!
//! Document-store client: a thin facade over the MongoDB driver for bulk
//! fixture loading (extended-JSON aware) and simple retrieval.

pub mod ec;
pub mod error;
pub mod fixtures;

pub use ec::*;
pub use error::*;
pub use fixtures::*;
