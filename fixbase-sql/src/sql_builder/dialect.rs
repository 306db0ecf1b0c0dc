//! Sql dialect
//!
//! Used to categorize database backends and hold their SQL fragments.

use std::str::FromStr;

use crate::{SqlError, SqlResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlDialect {
    Mysql,
    Postgres,
    Sqlite,
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mysql => write!(f, "mysql"),
            Self::Postgres => write!(f, "postgres"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        match s {
            "mysql" | "m" => Ok(SqlDialect::Mysql),
            "postgres" | "p" => Ok(SqlDialect::Postgres),
            "sqlite" | "s" => Ok(SqlDialect::Sqlite),
            _ => Err(SqlError::new_common_error(format!(
                "{s} is not a valid sql dialect"
            ))),
        }
    }
}

impl SqlDialect {
    /// server-side current-UTC-timestamp expression, the rendering of
    /// [`fixbase_core::Value::Now`]
    pub fn utc_timestamp_expr(&self) -> &'static str {
        match self {
            SqlDialect::Mysql => "UTC_TIMESTAMP()",
            SqlDialect::Postgres => "(NOW() AT TIME ZONE 'UTC')",
            SqlDialect::Sqlite => "CURRENT_TIMESTAMP",
        }
    }

    /// Catalog query returning the upper-cased stored name of `table_name`,
    /// if present. Both sides of the comparison go through `UPPER` because
    /// backends fold unquoted identifiers differently (postgres stores them
    /// lower-case). The caller compares the returned name for an exact match
    /// (use `fetch_optional`: one row or none).
    pub fn check_table_exists(&self, table_name: &str) -> String {
        let que = match self {
            Self::Sqlite => {
                r#"
                SELECT UPPER(name)
                FROM sqlite_master
                WHERE type = 'table' AND UPPER(name) = '?'
                LIMIT 1
                "#
            }
            _ => {
                r#"
                SELECT UPPER(table_name)
                FROM information_schema.tables
                WHERE UPPER(table_name) = '?'
                LIMIT 1
                "#
            }
        };
        que.replace('?', table_name)
    }
}

#[cfg(test)]
mod dialect_tests {
    use super::*;

    #[test]
    fn from_str_and_display_round_trip() {
        for s in ["mysql", "postgres", "sqlite"] {
            assert_eq!(SqlDialect::from_str(s).unwrap().to_string(), s);
        }
        assert!(SqlDialect::from_str("oracle").is_err());
    }

    #[test]
    fn table_exists_query_compares_folded_names() {
        let que = SqlDialect::Sqlite.check_table_exists("T_SITE");
        assert!(que.contains("UPPER(name) = 'T_SITE'"));

        // postgres folds unquoted identifiers to lower case, the lookup
        // must not depend on how the backend stored the name
        let que = SqlDialect::Postgres.check_table_exists("T_SITE");
        assert!(que.contains("UPPER(table_name) = 'T_SITE'"));

        let que = SqlDialect::Mysql.check_table_exists("T_SITE");
        assert!(que.contains("UPPER(table_name) = 'T_SITE'"));
    }
}
