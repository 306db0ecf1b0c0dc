//! CSV fixture loading test case
//!
//! test case:
//! 1. numeric-prefix ordering across a fixture directory
//! 1. cell coercion on the row-wise path
//! 1. per-file failure handling, no rollback
//! 1. raw multi-row loading

use std::path::PathBuf;
use std::str::FromStr;

use fixbase_core::{Condition, Value};
use fixbase_sql::{SqlEngine, SqlExecutor};

const CONN_SQLITE: &str = "sqlite::memory:";

async fn connected() -> anyhow::Result<SqlExecutor> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut exc = SqlExecutor::from_str(CONN_SQLITE)?;
    exc.connect().await?;
    Ok(exc)
}

fn fixture_dir(tag: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fixbase_sql_{}_{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
    dir
}

#[tokio::test]
async fn directory_loading_follows_numeric_prefix_order() -> anyhow::Result<()> {
    // lexical ordering would load 1, 10, 2 and scramble the tags
    let dir = fixture_dir(
        "order",
        &[
            ("1__t_load.csv", "TAG\nfirst\n"),
            ("2__t_load.csv", "TAG\nsecond\n"),
            ("10__t_load.csv", "TAG\nthird\n"),
        ],
    );

    let exc = connected().await?;
    exc.create_table("t_load", &[("tag", "VARCHAR(16)")]).await?;

    assert!(exc.load_fixture_dir(&dir).await?);

    let rows = exc.select("t_load", &[], None).await?;
    let tags = rows
        .iter()
        .map(|r| r.get("TAG").cloned().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        tags,
        vec![
            Value::Text("first".to_string()),
            Value::Text("second".to_string()),
            Value::Text("third".to_string()),
        ]
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn row_wise_loading_coerces_cells() -> anyhow::Result<()> {
    let dir = fixture_dir(
        "coerce",
        &[(
            "1__t_site.csv",
            "ID;NAME;CREATED_AT\n1;sample;now\n2;;null\n",
        )],
    );

    let exc = connected().await?;
    exc.create_table(
        "t_site",
        &[("id", "INT"), ("name", "VARCHAR(64)"), ("created_at", "DATETIME")],
    )
    .await?;

    let pairs = vec![("t_site".to_string(), dir.join("1__t_site.csv"))];
    assert!(exc.bulk_load_fixtures(&pairs).await?);

    let rows = exc.select("t_site", &[Condition::new("ID", 2)], None).await?;
    assert_eq!(rows.len(), 1);
    // empty CSV field stays an empty string, never a true null
    assert_eq!(rows[0].get("NAME"), Some(&Value::Text(String::new())));
    // the null marker token is a true null
    assert_eq!(rows[0].get("CREATED_AT"), Some(&Value::Null));

    let rows = exc.select("t_site", &[Condition::new("ID", 1)], None).await?;
    assert!(matches!(rows[0].get("CREATED_AT"), Some(Value::DateTime(_))));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn failed_row_finishes_its_file_then_aborts_the_rest() -> anyhow::Result<()> {
    let dir = fixture_dir(
        "abort",
        &[
            ("1__t_guard.csv", "ID\n1\n99\n2\n"),
            ("2__t_guard.csv", "ID\n3\n"),
        ],
    );

    let exc = connected().await?;
    exc.create_table("t_guard", &[("id", "INT CHECK (ID < 10)")])
        .await?;

    assert!(!exc.load_fixture_dir(&dir).await?);

    // every row of the failing file was attempted and the good ones stay,
    // no rollback; the second file was never touched
    let rows = exc.select("t_guard", &[], None).await?;
    let ids = rows
        .iter()
        .map(|r| r.get("ID").cloned().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![Value::Int(1), Value::Int(2)]);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn raw_loading_builds_one_statement_per_file() -> anyhow::Result<()> {
    let dir = fixture_dir("raw", &[("1__t_raw.csv", "ID;NAME\n1;a\n2;b\n")]);

    let exc = connected().await?;
    exc.create_table("t_raw", &[("id", "INT"), ("name", "VARCHAR(64)")])
        .await?;

    let pairs = vec![("T_RAW".to_string(), dir.join("1__t_raw.csv"))];
    exc.bulk_load_fixtures_raw(&pairs).await?;

    assert_eq!(exc.count_records("t_raw").await?, 2);
    // every raw value is quoted; sqlite column affinity still lands '1' as
    // an integer in the INT column
    let rows = exc.select("t_raw", &[Condition::new("ID", 1)], None).await?;
    assert_eq!(rows[0].get("NAME"), Some(&Value::Text("a".to_string())));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn missing_fixture_file_raises() -> anyhow::Result<()> {
    let exc = connected().await?;
    let pairs = vec![("t_none".to_string(), PathBuf::from("/nonexistent/0__t_none.csv"))];
    assert!(exc.bulk_load_fixtures(&pairs).await.is_err());
    Ok(())
}
