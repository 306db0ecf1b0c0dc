//! CSV fixture bulk-loading
//!
//! Fixture files are semicolon-separated CSV: the header row carries column
//! names, a missing field is an empty string (never a true null), and every
//! cell is re-coerced through [`Value::infer`] on the row-wise path. There is
//! no atomicity across rows or files: each insert commits on its own.

use std::path::{Path, PathBuf};

use fixbase_core::{sorted_fixture_files, Record, Value};
use tracing::info;

use crate::{stmt, SqlEngine, SqlError, SqlExecutor, SqlResult};

const DELIMITER: u8 = b';';

/// header row and data rows, rows padded to header width with empty strings
fn read_csv_records(path: &Path) -> SqlResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            SqlError::new_fixture_error(format!("cannot read fixture {}: {}", path.display(), e))
        })?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = record.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok((headers, rows))
}

impl SqlExecutor {
    /// Load each (table, file) pair row by row through [`SqlEngine::insert`].
    ///
    /// Every row of a file is attempted even after one fails; a file with
    /// any failed row then aborts the remaining files with `Ok(false)`.
    /// Rows already inserted are not rolled back. CSV/file errors raise.
    pub async fn bulk_load_fixtures(&self, table_to_file: &[(String, PathBuf)]) -> SqlResult<bool> {
        for (table, path) in table_to_file {
            info!("loading {} from {}", table, path.display());
            let (headers, rows) = read_csv_records(path)?;

            let mut file_ok = true;
            for row in rows {
                let rec = headers
                    .iter()
                    .zip(row.iter())
                    .map(|(name, cell)| (name.clone(), Value::infer(cell)))
                    .collect::<Record>();
                if !self.insert(table, &rec).await? {
                    file_ok = false;
                }
            }
            if !file_ok {
                return Ok(false);
            }

            info!("file {} loaded", path.display());
        }

        Ok(true)
    }

    /// Load every `<N>__<table>.<ext>` file under `dir`, in ascending numeric
    /// order of the filename prefix.
    pub async fn load_fixture_dir(&self, dir: &Path) -> SqlResult<bool> {
        let pairs = sorted_fixture_files(dir)?
            .into_iter()
            .map(|f| (f.table, f.path))
            .collect::<Vec<_>>();
        self.bulk_load_fixtures(&pairs).await
    }

    /// One multi-row `INSERT ... VALUES (...), (...)` per file, every value
    /// single-quoted regardless of type, executed through
    /// [`SqlEngine::execute_raw`]; errors raise.
    pub async fn bulk_load_fixtures_raw(
        &self,
        table_to_file: &[(String, PathBuf)],
    ) -> SqlResult<()> {
        for (table, path) in table_to_file {
            let (headers, rows) = read_csv_records(path)?;
            if rows.is_empty() {
                info!("fixture {} is empty, skipping", path.display());
                continue;
            }
            let que = stmt::insert_rows_quoted(table, &headers, &rows);
            self.execute_raw(&que, None).await?;
            info!("file {} loaded", path.display());
        }

        Ok(())
    }
}
