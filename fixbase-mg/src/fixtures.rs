//! JSON fixture bulk-loading
//!
//! Fixture files are JSON arrays of objects. Field values may be single-key
//! extended-JSON wrappers signalling type coercion: `{"$oid": <24-hex>}`
//! becomes an `ObjectId`, `{"$date": "YYYY-MM-DDTHH:MM:SS.sssZ"}` becomes a
//! BSON datetime. Inserts are unordered and tolerate partial failure:
//! duplicate-key conflicts are expected fixture noise and silently ignored,
//! any other write error is logged and recorded without aborting the batch.

use std::path::{Path, PathBuf};

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::NaiveDateTime;
use mongodb::error::ErrorKind;
use mongodb::options::InsertManyOptions;
use tracing::{error, info};

use crate::{MgError, MgResult, MongoExecutor};

/// mongod server code for a duplicate-key write error
const DUPLICATE_KEY_CODE: i32 = 11000;

/// ISO-8601 with milliseconds, the `$date` wrapper format
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// outcome of a bulk fixture load; non-duplicate write errors are recorded
/// here as well as logged
#[derive(Debug, Default)]
pub struct FixtureLoadReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub write_errors: Vec<String>,
}

/// Rewrite extended-JSON wrapper objects into their BSON counterparts,
/// in place. Wrapper objects with unknown keys are left untouched.
pub fn convert_extended_fields(documents: &mut [Document]) -> MgResult<()> {
    for document in documents.iter_mut() {
        let fields = document.keys().cloned().collect::<Vec<_>>();
        for field in fields {
            let replacement = match document.get(&field) {
                Some(Bson::Document(wrapper)) => {
                    if let Ok(oid) = wrapper.get_str("$oid") {
                        Some(Bson::ObjectId(ObjectId::parse_str(oid)?))
                    } else if let Ok(date) = wrapper.get_str("$date") {
                        let parsed =
                            NaiveDateTime::parse_from_str(date, DATE_FORMAT).map_err(|e| {
                                MgError::Fixture(format!("invalid $date value '{date}': {e}"))
                            })?;
                        Some(Bson::DateTime(bson::DateTime::from_millis(
                            parsed.and_utc().timestamp_millis(),
                        )))
                    } else {
                        None
                    }
                }
                _ => None,
            };
            if let Some(bson) = replacement {
                document.insert(field, bson);
            }
        }
    }
    Ok(())
}

/// Fold one file's write errors into the running report: duplicate-key
/// conflicts count as suppressed duplicates, anything else is logged and
/// recorded. Returns the number of failed documents.
fn record_write_errors<'a, I>(report: &mut FixtureLoadReport, collection: &str, errors: I) -> usize
where
    I: IntoIterator<Item = (i32, &'a str)>,
{
    let mut failed = 0usize;
    for (code, message) in errors {
        failed += 1;
        if code == DUPLICATE_KEY_CODE {
            report.duplicates += 1;
        } else {
            let msg = format!("write error on {} (code {}): {}", collection, code, message);
            error!("{}", msg);
            report.write_errors.push(msg);
        }
    }
    failed
}

/// read a fixture file as an ordered sequence of documents
pub fn read_fixture_file(path: &Path) -> MgResult<Vec<Document>> {
    let file = std::fs::File::open(path)
        .map_err(|e| MgError::Fixture(format!("cannot open {}: {}", path.display(), e)))?;
    let raw: Vec<serde_json::Value> = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| MgError::Fixture(format!("malformed json in {}: {}", path.display(), e)))?;

    raw.into_iter()
        .map(|value| bson::to_document(&value).map_err(MgError::from))
        .collect()
}

impl MongoExecutor {
    /// Bulk-insert fixture collections. For each (collection, file) pair the
    /// file is read as a JSON array, optionally run through extended-field
    /// coercion, and inserted unordered. Duplicate-key conflicts are
    /// suppressed; other write errors are logged and recorded but do not
    /// abort the remaining records or files. I/O, JSON and connection
    /// failures raise.
    pub async fn bulk_insert_fixtures(
        &mut self,
        collection_to_file: &[(String, PathBuf)],
        convert_extended: bool,
    ) -> MgResult<FixtureLoadReport> {
        if !self.is_connected() {
            self.connect().await?;
        }

        let mut report = FixtureLoadReport::default();

        for (name, path) in collection_to_file {
            let mut documents = read_fixture_file(path)?;
            if convert_extended {
                convert_extended_fields(&mut documents)?;
            }
            let total = documents.len();

            let collection = self.collection(name)?;
            let options = InsertManyOptions::builder()
                .ordered(false)
                .bypass_document_validation(true)
                .build();

            match collection.insert_many(documents, options).await {
                Ok(resp) => {
                    info!("bulk insert into {}: {} documents", name, resp.inserted_ids.len());
                    report.inserted += resp.inserted_ids.len();
                }
                Err(e) => match e.kind.as_ref() {
                    ErrorKind::BulkWrite(failure) => {
                        let failed = record_write_errors(
                            &mut report,
                            name,
                            failure
                                .write_errors
                                .iter()
                                .flatten()
                                .map(|we| (we.code, we.message.as_str())),
                        );
                        report.inserted += total - failed;
                    }
                    _ => return Err(e.into()),
                },
            }
        }

        info!("fixture insertion completed");
        Ok(report)
    }
}
