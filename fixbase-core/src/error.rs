//! FixbaseCoreError
//!
//! error type for fixbase core

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
