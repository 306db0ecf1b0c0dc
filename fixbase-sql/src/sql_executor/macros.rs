//! Sql executor macros

/// error when the connection has not been established yet
macro_rules! conn_n_err {
    ($pool:expr) => {
        if $pool.is_none() {
            return Err($crate::SqlError::ConnectionNotEstablished);
        }
    };
}

/// error when the connection has already been established
macro_rules! conn_e_err {
    ($pool:expr) => {
        if $pool.is_some() {
            return Err($crate::SqlError::ConnectionAlreadyEstablished);
        }
    };
}

pub(crate) use conn_e_err;
pub(crate) use conn_n_err;
