//! FixbaseMgError
//!
//! error type for the document-store client

use thiserror::Error;

pub type MgResult<T> = Result<T, MgError>;

#[derive(Error, Debug)]
pub enum MgError {
    #[error("connection has not been established yet")]
    ConnectionNotEstablished,

    #[error("connection failure: {0}")]
    Connection(String),

    #[error("fixture load failure: {0}")]
    Fixture(String),

    #[error(transparent)]
    Oid(#[from] bson::oid::Error),

    #[error(transparent)]
    BsonSer(#[from] bson::ser::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}
