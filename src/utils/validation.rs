//! Input validation utilities
//!
//! Custom validators for `#[validate(custom(function = ...))]` on request DTOs.

use std::borrow::Cow;

use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(error(
            "username_charset",
            "Username can only contain letters, numbers, dots, underscores, and hyphens",
        ));
    }
    if !username
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
    {
        return Err(error("username_start", "Username must start with a letter"));
    }
    Ok(())
}

/// Reject values that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "Value cannot be blank"));
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("j.doe-2").is_ok());
        assert!(validate_username("123abc").is_err());
        assert!(validate_username("user@name").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Spring Cup").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  good game\u{0007} "), "good game");
        assert_eq!(sanitize_string("line1\nline2"), "line1\nline2");
    }
}
