use crate::error::CoreError;

const NANP_DIGITS: usize = 10;
const E164_MIN_DIGITS: usize = 8;
const E164_MAX_DIGITS: usize = 15;

/// Canonicalizes a phone number for storage and comparison.
///
/// North American numbers (ten digits, optionally prefixed with country code 1)
/// become `+1-AAA-BBB-CCCC`. Other numbers must carry a leading `+` and fall in
/// the E.164 length range; they are stored as `+` followed by the digits.
/// Extensions (`x`, `#`, `;`, `,`) are dropped.
pub fn normalize_phone(value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    let invalid = || CoreError::InvalidPhone(trimmed.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let international = trimmed.starts_with('+');
    let mut digits = String::new();

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        if matches!(ch, 'x' | 'X' | '#' | ';' | ',') {
            if digits.is_empty() {
                return Err(invalid());
            }
            break;
        }
    }

    match digits.len() {
        NANP_DIGITS if !international => Ok(format_nanp(&digits)),
        len if len == NANP_DIGITS + 1 && digits.starts_with('1') => Ok(format_nanp(&digits[1..])),
        len if international && (E164_MIN_DIGITS..=E164_MAX_DIGITS).contains(&len) => {
            Ok(format!("+{digits}"))
        }
        _ => Err(invalid()),
    }
}

fn format_nanp(digits: &str) -> String {
    format!("+1-{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..])
}
