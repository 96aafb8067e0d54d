//! Input validation shared by request payloads.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Treats blank strings as absent, which is how the client encodes "no value".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ali@example.pk").is_ok());
        assert!(validate_email("  ali@example.pk ").is_ok());
        assert!(validate_email("ali@example").is_err());
        assert!(validate_email("not an email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_password_min_length() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_require_non_empty_rejects_whitespace() {
        assert!(require_non_empty("title", "   ").is_err());
        assert!(require_non_empty("title", "Rust Engineer").is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Lahore ".into())), Some("Lahore".into()));
        assert_eq!(non_blank(None), None);
    }
}
