//! Sql row types
//!
//! Row-to-record decoding. Each driver reports column type info by name;
//! extraction matches those names to [`Value`] variants. Based on the sqlx
//! types mappings:
//! - MySQL: https://docs.rs/sqlx/latest/sqlx/mysql/types/index.html
//! - Postgres: https://docs.rs/sqlx/latest/sqlx/postgres/types/index.html
//! - SQLite: https://docs.rs/sqlx/latest/sqlx/sqlite/types/index.html

use chrono::{DateTime, Utc};
use fixbase_core::{Record, Value};
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::SqlResult;

/// Type of Sql row
pub(crate) enum SqlRow {
    Mysql(MySqlRow),
    Pg(PgRow),
    Sqlite(SqliteRow),
}

impl From<MySqlRow> for SqlRow {
    fn from(r: MySqlRow) -> Self {
        Self::Mysql(r)
    }
}

impl From<PgRow> for SqlRow {
    fn from(r: PgRow) -> Self {
        Self::Pg(r)
    }
}

impl From<SqliteRow> for SqlRow {
    fn from(r: SqliteRow) -> Self {
        Self::Sqlite(r)
    }
}

/// Decode a driver row into a [`Record`], keeping the driver's column order
/// and reported column names.
pub(crate) fn row_to_record(row: &SqlRow) -> SqlResult<Record> {
    let mut rec = Record::new();

    match row {
        SqlRow::Mysql(r) => {
            for (idx, col) in r.columns().iter().enumerate() {
                rec.push(col.name(), mysql_value(r, idx, col.type_info().name())?);
            }
        }
        SqlRow::Pg(r) => {
            for (idx, col) in r.columns().iter().enumerate() {
                rec.push(col.name(), pg_value(r, idx, col.type_info().name())?);
            }
        }
        SqlRow::Sqlite(r) => {
            for (idx, col) in r.columns().iter().enumerate() {
                rec.push(col.name(), sqlite_value(r, idx, col.type_info().name())?);
            }
        }
    }

    Ok(rec)
}

fn mysql_value(row: &MySqlRow, idx: usize, type_name: &str) -> SqlResult<Value> {
    let value = match type_name {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.into(),
        "TINYINT" => row.try_get::<Option<i8>, _>(idx)?.map(|v| v as i64).into(),
        "SMALLINT" => row.try_get::<Option<i16>, _>(idx)?.map(|v| v as i64).into(),
        "MEDIUMINT" | "INT" => row.try_get::<Option<i32>, _>(idx)?.map(|v| v as i64).into(),
        "BIGINT" => row.try_get::<Option<i64>, _>(idx)?.into(),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
            row.try_get::<Option<u32>, _>(idx)?.map(|v| v as i64).into()
        }
        "BIGINT UNSIGNED" => row.try_get::<Option<u64>, _>(idx)?.map(|v| v as i64).into(),
        "FLOAT" => row.try_get::<Option<f32>, _>(idx)?.map(|v| v as f64).into(),
        "DOUBLE" => row.try_get::<Option<f64>, _>(idx)?.into(),
        "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" => {
            row.try_get::<Option<String>, _>(idx)?.into()
        }
        "DATETIME" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .into(),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|v| v.naive_utc())
            .into(),
        // unknown column types degrade to text, then to null
        _ => row.try_get::<Option<String>, _>(idx).unwrap_or(None).into(),
    };

    Ok(value)
}

fn pg_value(row: &PgRow, idx: usize, type_name: &str) -> SqlResult<Value> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.into(),
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(|v| v as i64).into(),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(|v| v as i64).into(),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.into(),
        "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(|v| v as f64).into(),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.into(),
        "VARCHAR" | "CHAR" | "TEXT" | "NAME" | "BPCHAR" => {
            row.try_get::<Option<String>, _>(idx)?.into()
        }
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .into(),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|v| v.naive_utc())
            .into(),
        _ => row.try_get::<Option<String>, _>(idx).unwrap_or(None).into(),
    };

    Ok(value)
}

fn sqlite_value(row: &SqliteRow, idx: usize, type_name: &str) -> SqlResult<Value> {
    let value = match type_name {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.into(),
        "INTEGER" | "INT" => row.try_get::<Option<i64>, _>(idx)?.into(),
        "REAL" => row.try_get::<Option<f64>, _>(idx)?.into(),
        "TEXT" => row.try_get::<Option<String>, _>(idx)?.into(),
        "DATETIME" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .into(),
        // expression columns like COUNT(*) carry no declared type and the
        // statement-level info reports NULL; the real type only shows up on
        // the value itself
        "NULL" => {
            let runtime = {
                let raw = row.try_get_raw(idx)?;
                raw.type_info().name().to_string()
            };
            match runtime.as_str() {
                "INTEGER" => row.try_get::<Option<i64>, _>(idx)?.into(),
                "REAL" => row.try_get::<Option<f64>, _>(idx)?.into(),
                "TEXT" => row.try_get::<Option<String>, _>(idx)?.into(),
                "NULL" => Value::Null,
                _ => row.try_get::<Option<String>, _>(idx).unwrap_or(None).into(),
            }
        }
        _ => row.try_get::<Option<String>, _>(idx).unwrap_or(None).into(),
    };

    Ok(value)
}
