use crate::error::{ImportError, Result};
use crate::json::{parse_contacts, ParsedImport};
use crate::report::ImportReport;
use dialbook_core::domain::{DuplicatePolicy, ValidContact};
use dialbook_store::error::StoreError;
use dialbook_store::Store;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a JSON contact file and stores every valid record.
///
/// Unreadable files and documents that are not JSON fail the whole call.
/// Individual bad records (missing fields, bad phone numbers) are counted in
/// the report instead. Database failures abort the run.
pub fn import_file(
    store: &Store,
    path: &Path,
    policy: DuplicatePolicy,
    now_utc: i64,
) -> Result<ImportReport> {
    let data = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_contacts(&data)?;
    debug!(
        path = %path.display(),
        records = parsed.len(),
        "parsed import file"
    );
    import_records(store, parsed, policy, now_utc)
}

pub fn import_records(
    store: &Store,
    parsed: ParsedImport,
    policy: DuplicatePolicy,
    now_utc: i64,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    for failure in parsed.failures {
        report.record_failure(failure.index, failure.reason);
    }

    for (index, draft) in parsed.records {
        let valid = match draft.validate() {
            Ok(valid) => valid,
            Err(err) => {
                debug!(index, error = %err, "record failed validation");
                report.record_failure(index, err.to_string());
                continue;
            }
        };

        match store_record(store, valid, policy, now_utc) {
            Ok(Outcome::Imported) => report.imported += 1,
            Ok(Outcome::Updated) => report.updated += 1,
            Ok(Outcome::Skipped(warning)) => {
                report.skipped += 1;
                report.warnings.push(format!("record {index}: {warning}"));
            }
            Err(err) if !err.is_connection() => {
                debug!(index, error = %err, "record rejected by store");
                report.record_failure(index, err.to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }

    report.failures.sort_by_key(|failure| failure.index);
    Ok(report)
}

enum Outcome {
    Imported,
    Updated,
    Skipped(String),
}

fn store_record(
    store: &Store,
    contact: ValidContact,
    policy: DuplicatePolicy,
    now_utc: i64,
) -> std::result::Result<Outcome, StoreError> {
    let contacts = store.contacts();
    let ValidContact { name, phone, email } = contact.clone();
    match contacts.insert(now_utc, contact) {
        Ok(created) => {
            debug!(id = %created.id, phone = %created.phone, "imported contact");
            Ok(Outcome::Imported)
        }
        Err(StoreError::Duplicate(_)) => match policy {
            DuplicatePolicy::Skip => Ok(Outcome::Skipped(format!(
                "phone {phone} already exists; skipping"
            ))),
            DuplicatePolicy::Update => {
                let existing = contacts
                    .find_by_phone(&phone)?
                    .ok_or_else(|| StoreError::NotFound(format!("contact with phone {phone}")))?;
                let updated =
                    contacts.update_details(now_utc, existing.id, &name, email.as_deref())?;
                debug!(id = %updated.id, phone = %updated.phone, "updated contact");
                Ok(Outcome::Updated)
            }
        },
        Err(err) => Err(err),
    }
}
