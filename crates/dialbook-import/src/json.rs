use crate::error::{ImportError, Result};
use crate::report::ImportFailure;
use dialbook_core::domain::ContactDraft;
use serde::Deserialize;
use serde_json::Value;

/// Records decoded from an import file. Elements that could not be decoded
/// are kept aside as failures so the rest of the batch still goes through.
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub records: Vec<(usize, ContactDraft)>,
    pub failures: Vec<ImportFailure>,
}

impl ParsedImport {
    pub fn len(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Records(Vec<Value>),
    Wrapped { contacts: Vec<Value> },
}

/// Parses either a bare array of contact objects or `{"contacts": [...]}`.
pub fn parse_contacts(data: &str) -> Result<ParsedImport> {
    let document: Value =
        serde_json::from_str(data).map_err(|err| ImportError::Parse(err.to_string()))?;
    let elements = match serde_json::from_value(document) {
        Ok(ImportDocument::Records(values)) => values,
        Ok(ImportDocument::Wrapped { contacts }) => contacts,
        Err(_) => {
            return Err(ImportError::Parse(
                "expected an array of contacts or an object with a \"contacts\" array"
                    .to_string(),
            ))
        }
    };

    let mut parsed = ParsedImport::default();
    for (index, value) in elements.into_iter().enumerate() {
        match decode_record(value) {
            Ok(draft) => parsed.records.push((index, draft)),
            Err(reason) => parsed.failures.push(ImportFailure { index, reason }),
        }
    }
    Ok(parsed)
}

fn decode_record(value: Value) -> std::result::Result<ContactDraft, String> {
    if !value.is_object() {
        return Err(format!("expected an object, found {}", kind_of(&value)));
    }
    serde_json::from_value(value).map_err(|err| err.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::parse_contacts;
    use crate::error::ImportError;

    #[test]
    fn parse_accepts_bare_array() {
        let parsed = parse_contacts(
            r#"[{"name": "Ada", "phone": "415-555-1212", "email": "ada@example.com"}]"#,
        )
        .expect("parse");
        assert_eq!(parsed.records.len(), 1);
        let (index, draft) = &parsed.records[0];
        assert_eq!(*index, 0);
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn parse_accepts_wrapped_contacts_object() {
        let parsed = parse_contacts(
            r#"{"contacts": [{"name": "Ada", "phone": "415-555-1212"}, {"name": "Grace", "phone": "212-555-0101", "email": null}]}"#,
        )
        .expect("parse");
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.failures.is_empty());
        assert_eq!(parsed.records[1].1.email, None);
    }

    #[test]
    fn parse_reports_bad_records_by_index() {
        let parsed = parse_contacts(
            r#"[
                {"name": "Ada", "phone": "415-555-1212"},
                {"name": "No Phone"},
                42,
                {"name": "Grace", "phone": 2125550101},
                {"name": "Linus", "phone": "503-555-0199"}
            ]"#,
        )
        .expect("parse");
        assert_eq!(parsed.len(), 5);
        let good: Vec<usize> = parsed.records.iter().map(|(index, _)| *index).collect();
        assert_eq!(good, [0, 4]);
        let bad: Vec<usize> = parsed.failures.iter().map(|failure| failure.index).collect();
        assert_eq!(bad, [1, 2, 3]);
        assert!(parsed.failures[0].reason.contains("missing field `phone`"));
        assert!(parsed.failures[1].reason.contains("expected an object"));
    }

    #[test]
    fn parse_rejects_malformed_document() {
        let err = parse_contacts("[{\"name\": ").expect_err("malformed");
        assert!(matches!(err, ImportError::Parse(_)));

        let err = parse_contacts(r#"{"people": []}"#).expect_err("wrong shape");
        assert!(err.to_string().contains("\"contacts\" array"));
    }
}
