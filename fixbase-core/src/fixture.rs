//! fixture-file discovery
//!
//! Fixture files follow the `<N>__<table>.<ext>` naming convention, where `N`
//! is a load-order sort key. Ordering is ascending **numeric** on `N`, so
//! `10__` loads after `2__` (lexical ordering would get this wrong).

use std::path::{Path, PathBuf};

use crate::CoreResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    pub order: u32,
    pub table: String,
    pub path: PathBuf,
}

/// Parse `<N>__<table>.<ext>` into its sort key and table name.
/// Returns `None` when the name does not follow the convention.
pub fn parse_fixture_name(name: &str) -> Option<(u32, String)> {
    let (prefix, rest) = name.split_once("__")?;
    let order = prefix.parse::<u32>().ok()?;
    let table = match rest.split_once('.') {
        Some((stem, _)) => stem,
        None => rest,
    };
    if table.is_empty() {
        return None;
    }
    Some((order, table.to_owned()))
}

/// Enumerate fixture files under `dir`, sorted by ascending numeric prefix.
/// Entries not matching the naming convention are skipped.
pub fn sorted_fixture_files(dir: &Path) -> CoreResult<Vec<FixtureFile>> {
    let mut found = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some((order, table)) = parse_fixture_name(&name) {
            found.push(FixtureFile {
                order,
                table,
                path: entry.path(),
            });
        }
    }

    found.sort_by_key(|f| f.order);

    Ok(found)
}

#[cfg(test)]
mod fixture_tests {
    use super::*;

    #[test]
    fn parse_follows_the_naming_convention() {
        assert_eq!(
            parse_fixture_name("1__t_site.csv"),
            Some((1, "t_site".to_string()))
        );
        assert_eq!(
            parse_fixture_name("10__t_wsc_customer.csv"),
            Some((10, "t_wsc_customer".to_string()))
        );
        assert_eq!(parse_fixture_name("t_site.csv"), None);
        assert_eq!(parse_fixture_name("x__t_site.csv"), None);
        assert_eq!(parse_fixture_name("3__.csv"), None);
    }

    #[test]
    fn directory_listing_orders_numerically() {
        let dir = std::env::temp_dir().join(format!(
            "fixbase_core_fixture_test_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["1__alpha.csv", "10__gamma.csv", "2__beta.csv", "notes.txt"] {
            std::fs::write(dir.join(name), "A\n1\n").unwrap();
        }

        let files = sorted_fixture_files(&dir).unwrap();
        let tables = files.iter().map(|f| f.table.as_str()).collect::<Vec<_>>();
        assert_eq!(tables, vec!["alpha", "beta", "gamma"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
