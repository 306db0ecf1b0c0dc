//! Database executor
//!
//! `SqlExecutor` owns a single connection to the relational store and exposes
//! the structured query-building operations. State machine: `Disconnected ->
//! Connected` on [`SqlExecutor::open`] (the connection is established
//! eagerly), `Connected -> Disconnected` on `disconnect`; every other
//! operation requires `Connected` and fails with
//! [`SqlError::ConnectionNotEstablished`] otherwise.

use std::str::FromStr;

use async_trait::async_trait;
use fixbase_core::{Condition, Record, Value};
use tracing::{debug, error, warn};

use super::{conn_e_err, conn_n_err, LoaderPool, SqlConnInfo};
use crate::{stmt, SqlDialect, SqlError, SqlResult};

pub struct SqlExecutor {
    dialect: SqlDialect,
    conn_str: String,
    pool: Option<LoaderPool>,
}

impl SqlExecutor {
    /// constructor, disconnected
    pub fn new(conn_info: SqlConnInfo) -> Self {
        SqlExecutor {
            dialect: conn_info.dialect.clone(),
            conn_str: conn_info.to_string(),
            pool: None,
        }
    }

    /// construct and eagerly connect
    pub async fn open(conn_info: SqlConnInfo) -> SqlResult<Self> {
        let mut exc = Self::new(conn_info);
        exc.connect().await?;
        Ok(exc)
    }

    pub fn dialect(&self) -> &SqlDialect {
        &self.dialect
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }
}

impl FromStr for SqlExecutor {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut conn = s.split(':');
        let dialect_str = conn
            .next()
            .ok_or_else(|| SqlError::new_common_error("invalid conn str"))?;

        let dialect = SqlDialect::from_str(dialect_str)?;
        Ok(SqlExecutor {
            dialect,
            conn_str: s.to_string(),
            pool: None,
        })
    }
}

/// The relational-store operation surface.
///
/// Single-row mutating operations (`insert`, `update`, `delete_where`,
/// `delete_all`) never raise for query-execution failure: the failed query
/// and error are logged and `Ok(false)` is returned. Administrative
/// operations (`execute_raw`, `create_table`, `drop_table`) raise, since no
/// sensible partial-success value exists.
#[async_trait]
pub trait SqlEngine: Send + Sync {
    /// connect to the database
    async fn connect(&mut self) -> SqlResult<()>;

    /// disconnect; fails if the connection was never opened or already closed
    async fn disconnect(&mut self) -> SqlResult<()>;

    /// conditioned select, records in driver result order
    async fn select(
        &self,
        table: &str,
        conditions: &[Condition],
        columns: Option<&[&str]>,
    ) -> SqlResult<Vec<Record>>;

    /// select with a caller-supplied WHERE clause, inserted verbatim:
    /// trusted input only
    async fn select_raw_where(
        &self,
        table: &str,
        raw_condition: &str,
        columns: Option<&[&str]>,
    ) -> SqlResult<Vec<Record>>;

    /// single-row insert
    async fn insert(&self, table: &str, values: &Record) -> SqlResult<bool>;

    /// conditioned update
    async fn update(
        &self,
        table: &str,
        values_to_set: &Record,
        conditions: &[Condition],
    ) -> SqlResult<bool>;

    /// conditioned delete; refuses an empty condition set
    async fn delete_where(&self, table: &str, conditions: &[Condition]) -> SqlResult<bool>;

    /// unconditioned delete, the only sanctioned way to clear a table
    async fn delete_all(&self, table: &str) -> SqlResult<bool>;

    /// arbitrary sql; batch-execute semantics when parameter sets are given
    async fn execute_raw(&self, query: &str, params: Option<&[Vec<Value>]>) -> SqlResult<u64>;

    /// no-op when the table already exists
    async fn create_table(&self, table: &str, columns: &[(&str, &str)]) -> SqlResult<()>;

    /// unconditional drop
    async fn drop_table(&self, table: &str) -> SqlResult<()>;

    /// exact catalog name match on the upper-cased table name
    async fn table_exists(&self, table: &str) -> SqlResult<bool>;

    async fn count_records(&self, table: &str) -> SqlResult<i64>;
}

#[async_trait]
impl SqlEngine for SqlExecutor {
    async fn connect(&mut self) -> SqlResult<()> {
        conn_e_err!(self.pool);
        let pool = LoaderPool::connect(&self.dialect, &self.conn_str)
            .await
            .map_err(|e| {
                SqlError::new_connection_error(format!("cannot connect to {}: {}", self.dialect, e))
            })?;
        self.pool = Some(pool);
        debug!("connected - {}", self.dialect);
        Ok(())
    }

    async fn disconnect(&mut self) -> SqlResult<()> {
        conn_n_err!(self.pool);
        if let Some(pool) = self.pool.take() {
            pool.disconnect().await;
        }
        debug!("disconnected - {}", self.dialect);
        Ok(())
    }

    async fn select(
        &self,
        table: &str,
        conditions: &[Condition],
        columns: Option<&[&str]>,
    ) -> SqlResult<Vec<Record>> {
        conn_n_err!(self.pool);
        let que = stmt::select(&self.dialect, table, conditions, columns);
        debug!("query -> {}", que);
        self.pool.as_ref().unwrap().fetch_all(&que).await
    }

    async fn select_raw_where(
        &self,
        table: &str,
        raw_condition: &str,
        columns: Option<&[&str]>,
    ) -> SqlResult<Vec<Record>> {
        conn_n_err!(self.pool);
        let que = stmt::select_raw_where(table, raw_condition, columns);
        debug!("query -> {}", que);
        self.pool.as_ref().unwrap().fetch_all(&que).await
    }

    async fn insert(&self, table: &str, values: &Record) -> SqlResult<bool> {
        conn_n_err!(self.pool);
        if values.is_empty() {
            return Ok(false);
        }
        let que = stmt::insert(&self.dialect, table, values);
        debug!("query -> {}", que);
        match self.pool.as_ref().unwrap().execute(&que).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("query -> {}", que);
                error!("{}", e);
                Ok(false)
            }
        }
    }

    async fn update(
        &self,
        table: &str,
        values_to_set: &Record,
        conditions: &[Condition],
    ) -> SqlResult<bool> {
        conn_n_err!(self.pool);
        if values_to_set.is_empty() {
            return Ok(false);
        }
        let que = stmt::update(&self.dialect, table, values_to_set, conditions);
        debug!("query -> {}", que);
        match self.pool.as_ref().unwrap().execute(&que).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("query -> {}", que);
                error!("{}", e);
                Ok(false)
            }
        }
    }

    async fn delete_where(&self, table: &str, conditions: &[Condition]) -> SqlResult<bool> {
        conn_n_err!(self.pool);
        // never delete a whole table through the conditioned path
        if conditions.is_empty() {
            warn!("delete_where on {} refused: empty condition set", table);
            return Ok(false);
        }
        let que = stmt::delete(&self.dialect, table, conditions);
        debug!("query -> {}", que);
        match self.pool.as_ref().unwrap().execute(&que).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("query -> {}", que);
                error!("{}", e);
                Ok(false)
            }
        }
    }

    async fn delete_all(&self, table: &str) -> SqlResult<bool> {
        conn_n_err!(self.pool);
        let que = stmt::delete_all(table);
        debug!("query -> {}", que);
        match self.pool.as_ref().unwrap().execute(&que).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("query -> {}", que);
                error!("{}", e);
                Ok(false)
            }
        }
    }

    async fn execute_raw(&self, query: &str, params: Option<&[Vec<Value>]>) -> SqlResult<u64> {
        conn_n_err!(self.pool);
        debug!("query -> {}", query);
        match params {
            Some(sets) => {
                self.pool
                    .as_ref()
                    .unwrap()
                    .execute_batch(query, sets)
                    .await
            }
            None => self.pool.as_ref().unwrap().execute(query).await,
        }
    }

    async fn create_table(&self, table: &str, columns: &[(&str, &str)]) -> SqlResult<()> {
        conn_n_err!(self.pool);
        if self.table_exists(table).await? {
            debug!("table {} exists", table);
            return Ok(());
        }
        let que = stmt::create_table(table, columns);
        debug!("query -> {}", que);
        self.pool.as_ref().unwrap().execute(&que).await?;
        Ok(())
    }

    async fn drop_table(&self, table: &str) -> SqlResult<()> {
        conn_n_err!(self.pool);
        let que = stmt::drop_table(table);
        debug!("query -> {}", que);
        self.pool.as_ref().unwrap().execute(&que).await?;
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> SqlResult<bool> {
        conn_n_err!(self.pool);
        let table_upper = table.to_uppercase();
        let que = self.dialect.check_table_exists(&table_upper);
        // one row or none; the catalog query returns the upper-cased stored
        // name, so the final comparison is exact regardless of how the
        // backend folded the identifier
        let res = self.pool.as_ref().unwrap().fetch_optional(&que).await?;
        let exists = match res {
            Some(rec) => matches!(
                rec.values().next(),
                Some(Value::Text(name)) if name == &table_upper
            ),
            None => false,
        };
        Ok(exists)
    }

    async fn count_records(&self, table: &str) -> SqlResult<i64> {
        conn_n_err!(self.pool);
        let que = stmt::count(table);
        debug!("query -> {}", que);
        let res = self.pool.as_ref().unwrap().fetch_optional(&que).await?;
        // the count is the first (only) column of the single result row,
        // read positionally rather than by column name
        match res.as_ref().and_then(|rec| rec.values().next()) {
            Some(Value::Int(n)) => Ok(*n),
            _ => Err(SqlError::new_common_error("count not available")),
        }
    }
}
