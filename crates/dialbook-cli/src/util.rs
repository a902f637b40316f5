use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use dialbook_core::domain::{Contact, ContactId, SearchField};
use dialbook_import::ImportReport;
use std::io::Write;
use std::str::FromStr;

use crate::error::invalid_input;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_date(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

pub fn parse_contact_id(raw: &str) -> Result<ContactId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("contact id cannot be empty"));
    }
    ContactId::from_str(trimmed).map_err(|_| invalid_input(format!("invalid contact id: {trimmed}")))
}

pub fn parse_search_field(raw: &str) -> Result<SearchField> {
    SearchField::from_str(raw).map_err(|err| invalid_input(err.to_string()))
}

/// Blank strings mean "not provided".
pub fn optional_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn write_contact(out: &mut impl Write, position: Option<usize>, contact: &Contact) -> Result<()> {
    let indent = match position {
        Some(position) => {
            let label = format!("{position}. ");
            write!(out, "{label}")?;
            " ".repeat(label.len())
        }
        None => String::new(),
    };
    writeln!(out, "Name: {}", contact.name)?;
    writeln!(out, "{indent}Id: {}", contact.id)?;
    writeln!(
        out,
        "{indent}Email: {}",
        contact.email.as_deref().unwrap_or("-")
    )?;
    writeln!(out, "{indent}Phone: {}", contact.phone)?;
    writeln!(
        out,
        "{indent}Added: {}",
        format_timestamp_date(contact.created_at)
    )?;
    Ok(())
}

pub fn write_contact_list(out: &mut impl Write, contacts: &[Contact]) -> Result<()> {
    for (index, contact) in contacts.iter().enumerate() {
        write_contact(out, Some(index + 1), contact)?;
        writeln!(out, "-------------------")?;
    }
    Ok(())
}

pub fn write_import_report(out: &mut impl Write, report: &ImportReport) -> Result<()> {
    writeln!(
        out,
        "Imported contacts: created {}, updated {}, skipped {}, failed {}",
        report.imported, report.updated, report.skipped, report.failed
    )?;
    if !report.failures.is_empty() {
        writeln!(out, "Failures:")?;
        for failure in &report.failures {
            writeln!(out, "- record {}: {}", failure.index, failure.reason)?;
        }
    }
    if !report.warnings.is_empty() {
        writeln!(out, "Warnings:")?;
        for warning in &report.warnings {
            writeln!(out, "- {}", warning)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{optional_value, parse_contact_id, write_contact};
    use dialbook_core::domain::{Contact, ContactId};

    #[test]
    fn write_contact_indents_numbered_entries() {
        let contact = Contact {
            id: ContactId(7),
            name: "Ada Lovelace".to_string(),
            phone: "+1-415-555-1212".to_string(),
            email: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        };
        let mut out = Vec::new();
        write_contact(&mut out, Some(1), &contact).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1. Name: Ada Lovelace");
        assert_eq!(lines[1], "   Id: 7");
        assert_eq!(lines[2], "   Email: -");
        assert_eq!(lines[3], "   Phone: +1-415-555-1212");
    }

    #[test]
    fn parse_contact_id_rejects_garbage() {
        assert_eq!(parse_contact_id(" 12 ").expect("id"), ContactId(12));
        assert!(parse_contact_id("").is_err());
        assert!(parse_contact_id("twelve").is_err());
    }

    #[test]
    fn optional_value_drops_blank_input() {
        assert_eq!(optional_value("  "), None);
        assert_eq!(optional_value(" a@b.c "), Some("a@b.c".to_string()));
    }
}
