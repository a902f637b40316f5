/// Trims a database name and checks it is usable as a file stem: ASCII
/// letters, digits, `_`, `-` and `.`, not starting with a dot.
pub fn normalize_db_name(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let valid = !trimmed.is_empty()
        && !trimmed.starts_with('.')
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    valid.then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::normalize_db_name;

    #[test]
    fn accepts_plain_file_stems() {
        assert_eq!(normalize_db_name(" contact_database "), Some("contact_database"));
        assert_eq!(normalize_db_name("crm-2024.v1"), Some("crm-2024.v1"));
    }

    #[test]
    fn rejects_separators_spaces_and_hidden_names() {
        for raw in ["", "  ", "../escape", "a/b", "a\\b", "my db", ".hidden"] {
            assert_eq!(normalize_db_name(raw), None, "{raw:?}");
        }
    }
}
