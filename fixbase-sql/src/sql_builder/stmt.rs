//! Sql statements
//!
//! Builds DML/DDL statement text from records and condition pairs. Table and
//! column names are always upper-cased before being embedded, assuming
//! case-insensitive identifier folding on the server side. Values go through
//! [`render_value`]; condition pairs are combined with logical AND.
//!
//! Text literals are embedded with single quotes and **no escaping**. This is
//! a documented limitation of the contract (see the `embedded_quotes` test):
//! statement inputs are trusted, fixture-grade data only.

use fixbase_core::{Condition, Record, Value};
use itertools::Itertools;

use super::SqlDialect;

/// render a single value as a SQL literal
pub fn render_value(dialect: &SqlDialect, value: &Value) -> String {
    match value {
        Value::Bool(v) => match (dialect, v) {
            (SqlDialect::Sqlite, true) => "1".to_string(),
            (SqlDialect::Sqlite, false) => "0".to_string(),
            (_, true) => "TRUE".to_string(),
            (_, false) => "FALSE".to_string(),
        },
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Text(v) => format!("'{v}'"),
        Value::DateTime(v) => format!("'{}'", v.format("%Y-%m-%d %H:%M:%S")),
        Value::Now => dialect.utc_timestamp_expr().to_string(),
        Value::Raw(v) => v.clone(),
        Value::Null => "null".to_string(),
    }
}

fn condition_clause(dialect: &SqlDialect, conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(|c| {
            format!(
                "{}={}",
                c.key.to_uppercase(),
                render_value(dialect, &c.value)
            )
        })
        .join(" AND ")
}

fn column_list(columns: Option<&[&str]>) -> String {
    match columns {
        Some(cols) => cols.iter().map(|c| c.to_uppercase()).join(", "),
        None => "*".to_string(),
    }
}

pub fn select(
    dialect: &SqlDialect,
    table: &str,
    conditions: &[Condition],
    columns: Option<&[&str]>,
) -> String {
    let mut que = format!(
        "SELECT {} FROM {}",
        column_list(columns),
        table.to_uppercase()
    );
    if !conditions.is_empty() {
        que.push_str(" WHERE ");
        que.push_str(&condition_clause(dialect, conditions));
    }
    que
}

/// WHERE clause text is caller-supplied and inserted verbatim: trusted input only
pub fn select_raw_where(table: &str, raw_condition: &str, columns: Option<&[&str]>) -> String {
    format!(
        "SELECT {} FROM {} WHERE {}",
        column_list(columns),
        table.to_uppercase(),
        raw_condition
    )
}

pub fn insert(dialect: &SqlDialect, table: &str, values: &Record) -> String {
    let columns = values.names().map(|n| n.to_uppercase()).join(", ");
    let literals = values.values().map(|v| render_value(dialect, v)).join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.to_uppercase(),
        columns,
        literals
    )
}

/// one multi-row insert, every value single-quoted regardless of type
/// (the raw CSV bulk-load path)
pub fn insert_rows_quoted(table: &str, columns: &[String], rows: &[Vec<String>]) -> String {
    let cols = columns.iter().join(", ");
    let vals = rows
        .iter()
        .map(|row| format!("({})", row.iter().map(|v| format!("'{v}'")).join(", ")))
        .join(", ");
    format!("INSERT INTO {table} ({cols}) VALUES {vals}")
}

pub fn update(
    dialect: &SqlDialect,
    table: &str,
    values_to_set: &Record,
    conditions: &[Condition],
) -> String {
    let assignments = values_to_set
        .iter()
        .map(|(k, v)| format!("{}={}", k.to_uppercase(), render_value(dialect, v)))
        .join(", ");
    let mut que = format!("UPDATE {} SET {}", table.to_uppercase(), assignments);
    if !conditions.is_empty() {
        que.push_str(" WHERE ");
        que.push_str(&condition_clause(dialect, conditions));
    }
    que
}

/// conditioned delete; the executor refuses an empty condition set before ever
/// reaching this builder
pub fn delete(dialect: &SqlDialect, table: &str, conditions: &[Condition]) -> String {
    format!(
        "DELETE FROM {} WHERE {}",
        table.to_uppercase(),
        condition_clause(dialect, conditions)
    )
}

/// unconditioned delete, the only sanctioned way to clear a table
pub fn delete_all(table: &str) -> String {
    format!("DELETE FROM {}", table.to_uppercase())
}

pub fn create_table(table: &str, columns: &[(&str, &str)]) -> String {
    let cols = columns
        .iter()
        .map(|(name, ddl)| format!("{} {}", name.to_uppercase(), ddl))
        .join(", ");
    format!("CREATE TABLE {} ({})", table.to_uppercase(), cols)
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {}", table.to_uppercase())
}

/// count is read positionally from the result row, never by column name
pub fn count(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", table.to_uppercase())
}

#[cfg(test)]
mod stmt_tests {
    use super::*;
    use fixbase_core::rec;

    const D: SqlDialect = SqlDialect::Sqlite;

    #[test]
    fn now_token_renders_as_timestamp_expression() {
        for token in ["now", "NOW", "Now"] {
            let rendered = render_value(&D, &Value::from(token));
            assert_eq!(rendered, "CURRENT_TIMESTAMP");
        }
        assert_eq!(
            render_value(&SqlDialect::Mysql, &Value::Now),
            "UTC_TIMESTAMP()"
        );
        assert_eq!(
            render_value(&SqlDialect::Postgres, &Value::Now),
            "(NOW() AT TIME ZONE 'UTC')"
        );
    }

    #[test]
    fn null_token_renders_unquoted() {
        assert_eq!(render_value(&D, &Value::from("null")), "null");
    }

    #[test]
    fn text_renders_quoted() {
        assert_eq!(render_value(&D, &Value::from("sample")), "'sample'");
    }

    // Documented limitation: embedded quotes are passed through unescaped.
    // This pins the current (unsafe for untrusted input) behaviour.
    #[test]
    fn embedded_quotes_are_not_escaped() {
        assert_eq!(render_value(&D, &Value::from("o'brien")), "'o'brien'");
    }

    #[test]
    fn select_upper_cases_identifiers_and_joins_conditions_with_and() {
        let conds = vec![Condition::new("site_id", 1), Condition::new("name", "hq")];
        let que = select(&D, "t_site", &conds, None);
        assert_eq!(que, "SELECT * FROM T_SITE WHERE SITE_ID=1 AND NAME='hq'");

        let que = select(&D, "t_site", &[], Some(&["site_id", "name"]));
        assert_eq!(que, "SELECT SITE_ID, NAME FROM T_SITE");
    }

    #[test]
    fn select_raw_where_is_verbatim() {
        let que = select_raw_where("t_site", "SITE_ID in (1, 2)", None);
        assert_eq!(que, "SELECT * FROM T_SITE WHERE SITE_ID in (1, 2)");
    }

    #[test]
    fn insert_keeps_record_order() {
        let rec = rec!["id" => 1, "name" => "sample", "created_at" => "now"];
        let que = insert(&D, "t_site", &rec);
        assert_eq!(
            que,
            "INSERT INTO T_SITE (ID, NAME, CREATED_AT) VALUES (1, 'sample', CURRENT_TIMESTAMP)"
        );
    }

    #[test]
    fn update_with_and_without_conditions() {
        let set = rec!["name" => "renamed"];
        let que = update(&D, "t_site", &set, &[Condition::new("id", 1)]);
        assert_eq!(que, "UPDATE T_SITE SET NAME='renamed' WHERE ID=1");

        let que = update(&D, "t_site", &set, &[]);
        assert_eq!(que, "UPDATE T_SITE SET NAME='renamed'");
    }

    #[test]
    fn delete_variants() {
        let que = delete(&D, "t_site", &[Condition::new("id", 1)]);
        assert_eq!(que, "DELETE FROM T_SITE WHERE ID=1");
        assert_eq!(delete_all("t_site"), "DELETE FROM T_SITE");
    }

    #[test]
    fn ddl_statements() {
        let que = create_table("t_site", &[("id", "INT"), ("name", "VARCHAR(64)")]);
        assert_eq!(que, "CREATE TABLE T_SITE (ID INT, NAME VARCHAR(64))");
        assert_eq!(drop_table("t_site"), "DROP TABLE T_SITE");
        assert_eq!(count("t_site"), "SELECT COUNT(*) FROM T_SITE");
    }

    #[test]
    fn raw_multi_row_insert_quotes_everything() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string(), "".to_string()],
        ];
        let que = insert_rows_quoted("t_site", &columns, &rows);
        assert_eq!(
            que,
            "INSERT INTO t_site (id, name) VALUES ('1', 'a'), ('2', '')"
        );
    }
}
