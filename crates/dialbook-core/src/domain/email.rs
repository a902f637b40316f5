use crate::error::CoreError;

/// Trims and lowercases an email address. Blank input means "no email".
pub fn normalize_email(value: &str) -> Result<Option<String>, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let lowered = trimmed.to_ascii_lowercase();
    let mut parts = lowered.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !lowered.contains(char::is_whitespace)
        }
        _ => false,
    };
    if !valid {
        return Err(CoreError::InvalidEmail(trimmed.to_string()));
    }
    Ok(Some(lowered))
}
