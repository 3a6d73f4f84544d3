//! Common validation utilities for CineSync request payloads.

use validator::ValidationError;

/// Minimum length for a space name.
const MIN_SPACE_NAME_LEN: usize = 2;

/// Maximum length for a space name.
const MAX_SPACE_NAME_LEN: usize = 100;

/// Normalizes an email address for storage and comparison.
///
/// Emails are unique case-insensitively, so every lookup and insert goes
/// through this.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates a space name (trimmed, at least 2 characters).
pub fn validate_space_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.len() < MIN_SPACE_NAME_LEN {
        let mut err = ValidationError::new("space_name_length");
        err.message = Some("Space name must be at least 2 characters long".into());
        return Err(err);
    }
    if trimmed.len() > MAX_SPACE_NAME_LEN {
        let mut err = ValidationError::new("space_name_length");
        err.message = Some("Space name must be at most 100 characters long".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a movie title (non-empty after trimming).
pub fn validate_movie_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("movie_title_required");
        err.message = Some("Movie title is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("A@X.COM"), "a@x.com");
        assert_eq!(normalize_email("  b@x.com  "), "b@x.com");
        assert_eq!(normalize_email("MiXeD@Example.Org"), "mixed@example.org");
    }

    #[test]
    fn test_normalize_email_already_normalized() {
        assert_eq!(normalize_email("plain@x.com"), "plain@x.com");
    }

    #[test]
    fn test_validate_space_name() {
        assert!(validate_space_name("Movie Night").is_ok());
        assert!(validate_space_name("ab").is_ok());
        assert!(validate_space_name("a").is_err());
        assert!(validate_space_name("").is_err());
    }

    #[test]
    fn test_validate_space_name_whitespace_only() {
        assert!(validate_space_name("   ").is_err());
        // Trims before measuring
        assert!(validate_space_name("  ab  ").is_ok());
    }

    #[test]
    fn test_validate_space_name_too_long() {
        assert!(validate_space_name(&"a".repeat(101)).is_err());
        assert!(validate_space_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_space_name_error_message() {
        let err = validate_space_name("a").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Space name must be at least 2 characters long"
        );
    }

    #[test]
    fn test_validate_movie_title() {
        assert!(validate_movie_title("Dune").is_ok());
        assert!(validate_movie_title("").is_err());
        assert!(validate_movie_title("   ").is_err());
    }
}
