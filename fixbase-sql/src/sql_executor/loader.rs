//! Sql executor pool
//!
//! `LoaderPool` is a common facade over the sqlx pool types. Pools are capped
//! at a single connection: each client instance owns exactly one connection
//! for its lifetime, and no operation is safe to call concurrently on the
//! same instance without external synchronization.

use fixbase_core::{Record, Value};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{MySqlPool, PgPool, SqlitePool};

use super::types::{row_to_record, SqlRow};
use crate::{SqlDialect, SqlError, SqlResult};

/// bind one [`Value`] onto a sqlx query
macro_rules! bind_value {
    ($que:expr, $value:expr) => {
        match $value {
            Value::Bool(v) => $que.bind(*v),
            Value::Int(v) => $que.bind(*v),
            Value::Float(v) => $que.bind(*v),
            Value::Text(v) => $que.bind(v.as_str()),
            Value::DateTime(v) => $que.bind(*v),
            Value::Null => $que.bind(Option::<String>::None),
            Value::Now | Value::Raw(_) => {
                return Err(SqlError::new_common_error(
                    "now/raw values cannot be bound as statement parameters",
                ))
            }
        }
    };
}

/// one bound execution per parameter set
macro_rules! execute_batch_process {
    ($pool:expr, $query:expr, $sets:expr) => {{
        let mut affected = 0u64;
        for set in $sets {
            let mut que = sqlx::query($query);
            for value in set {
                que = bind_value!(que, value);
            }
            affected += que.execute($pool).await?.rows_affected();
        }
        affected
    }};
}

/// Enum type of the sqlx db pools
pub(crate) enum LoaderPool {
    Mysql(MySqlPool),
    Pg(PgPool),
    Sqlite(SqlitePool),
}

impl LoaderPool {
    /// open the single-connection pool for `dialect`
    pub async fn connect(dialect: &SqlDialect, conn_str: &str) -> SqlResult<Self> {
        let pool = match dialect {
            SqlDialect::Mysql => LoaderPool::Mysql(
                MySqlPoolOptions::new()
                    .max_connections(1)
                    .connect(conn_str)
                    .await?,
            ),
            SqlDialect::Postgres => LoaderPool::Pg(
                PgPoolOptions::new()
                    .max_connections(1)
                    .connect(conn_str)
                    .await?,
            ),
            SqlDialect::Sqlite => LoaderPool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect(conn_str)
                    .await?,
            ),
        };
        Ok(pool)
    }

    /// release the underlying connection
    pub async fn disconnect(&self) {
        match self {
            Self::Mysql(pool) => pool.close().await,
            Self::Pg(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }

    /// sql string execution, returns rows affected
    pub async fn execute(&self, query: &str) -> SqlResult<u64> {
        let affected = match self {
            Self::Mysql(pool) => sqlx::query(query).execute(pool).await?.rows_affected(),
            Self::Pg(pool) => sqlx::query(query).execute(pool).await?.rows_affected(),
            Self::Sqlite(pool) => sqlx::query(query).execute(pool).await?.rows_affected(),
        };
        Ok(affected)
    }

    /// batch execution with bound parameters, `executemany` semantics
    pub async fn execute_batch(&self, query: &str, param_sets: &[Vec<Value>]) -> SqlResult<u64> {
        let affected = match self {
            Self::Mysql(pool) => execute_batch_process!(pool, query, param_sets),
            Self::Pg(pool) => execute_batch_process!(pool, query, param_sets),
            Self::Sqlite(pool) => execute_batch_process!(pool, query, param_sets),
        };
        Ok(affected)
    }

    /// fetch all rows in driver result order
    pub async fn fetch_all(&self, query: &str) -> SqlResult<Vec<Record>> {
        match self {
            Self::Mysql(pool) => sqlx::query(query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|r| row_to_record(&SqlRow::from(r)))
                .collect(),
            Self::Pg(pool) => sqlx::query(query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|r| row_to_record(&SqlRow::from(r)))
                .collect(),
            Self::Sqlite(pool) => sqlx::query(query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|r| row_to_record(&SqlRow::from(r)))
                .collect(),
        }
    }

    /// fetch one row or none
    pub async fn fetch_optional(&self, query: &str) -> SqlResult<Option<Record>> {
        let row = match self {
            Self::Mysql(pool) => sqlx::query(query)
                .fetch_optional(pool)
                .await?
                .map(SqlRow::from),
            Self::Pg(pool) => sqlx::query(query)
                .fetch_optional(pool)
                .await?
                .map(SqlRow::from),
            Self::Sqlite(pool) => sqlx::query(query)
                .fetch_optional(pool)
                .await?
                .map(SqlRow::from),
        };

        row.map(|r| row_to_record(&r)).transpose()
    }
}
