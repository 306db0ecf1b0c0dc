//! FixbaseSqlError
//!
//! error type for the relational-store client

use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

pub type SqlResult<T> = Result<T, SqlError>;

#[derive(Debug)]
pub enum CommonError {
    Str(&'static str),
    String(String),
}

impl AsRef<str> for CommonError {
    fn as_ref(&self) -> &str {
        match self {
            CommonError::Str(s) => s,
            CommonError::String(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for CommonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommonError::Str(v) => write!(f, "{v}"),
            CommonError::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<&'static str> for CommonError {
    fn from(v: &'static str) -> Self {
        CommonError::Str(v)
    }
}

impl From<String> for CommonError {
    fn from(v: String) -> Self {
        CommonError::String(v)
    }
}

// ================================================================================================
// Nom error
// ================================================================================================

#[derive(Debug)]
pub struct NomError(String);

impl std::fmt::Display for NomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: AsRef<str>> ParseError<T> for NomError {
    fn from_error_kind(_: T, kind: ErrorKind) -> Self {
        NomError(format!("Nom error code: {kind:?}"))
    }

    fn append(_: T, kind: ErrorKind, other: Self) -> Self {
        NomError(format!("{other:?}\nerror code: {kind:?}"))
    }
}

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("common error {0}")]
    Common(CommonError),

    #[error("connection has not been established yet")]
    ConnectionNotEstablished,

    #[error("connection has already been established")]
    ConnectionAlreadyEstablished,

    #[error("connection failure: {0}")]
    Connection(CommonError),

    #[error("fixture load failure: {0}")]
    Fixture(CommonError),

    #[error(transparent)]
    Core(#[from] fixbase_core::CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    #[error(transparent)]
    Nom(#[from] nom::Err<NomError>),
}

impl SqlError {
    pub fn new_common_error<T>(msg: T) -> SqlError
    where
        T: Into<CommonError>,
    {
        SqlError::Common(msg.into())
    }

    pub fn new_connection_error<T>(msg: T) -> SqlError
    where
        T: Into<CommonError>,
    {
        SqlError::Connection(msg.into())
    }

    pub fn new_fixture_error<T>(msg: T) -> SqlError
    where
        T: Into<CommonError>,
    {
        SqlError::Fixture(msg.into())
    }
}
