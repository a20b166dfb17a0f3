/// Phone number normalization
use crate::error::{AuthError, Result};

/// Canonicalize a submitted phone number.
///
/// Strips everything but digits, requires at least 10 of them, drops a
/// leading `7`/`8` trunk digit and prefixes `+7`. Phone numbers double as
/// account logins, so every lookup goes through this first.
pub fn normalize(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return Err(AuthError::InvalidPhoneNumber(raw.to_string()));
    }
    let skip = match digits.as_bytes()[0] {
        b'7' | b'8' => 1,
        _ => 0,
    };
    let significant: String = digits.chars().skip(skip).take(10).collect();
    Ok(format!("+7{significant}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_formatted_numbers() {
        assert_eq!(normalize("8 (912) 345-67-89").unwrap(), "+79123456789");
        assert_eq!(normalize("+7 912 345 67 89").unwrap(), "+79123456789");
        assert_eq!(normalize("9123456789").unwrap(), "+79123456789");
    }

    #[test]
    fn test_rejects_short_numbers() {
        assert!(matches!(
            normalize("12345"),
            Err(AuthError::InvalidPhoneNumber(_))
        ));
    }
}
