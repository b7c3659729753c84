//! Common validation utilities.

use validator::{ValidateEmail, ValidationError};

/// Maximum length of a free-text search query.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 100;

/// Maximum length of a personal message attached to an invitation.
pub const MAX_PERSONAL_MESSAGE_LENGTH: usize = 2000;

/// Normalizes an email address for comparison and storage.
///
/// Addresses are compared case-insensitively, so the canonical form is the
/// trimmed, lowercased string.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that an email address is well formed.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let normalized = normalize_email(email);
    if !normalized.is_empty() && normalized.as_str().validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Email address is not valid".into());
        Err(err)
    }
}

/// Normalizes a search query: trims whitespace and lowercases.
///
/// Returns `None` for blank queries, which callers treat as "no filter".
pub fn normalize_search_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Validates the length of a search query.
pub fn validate_search_query(query: &str) -> Result<(), ValidationError> {
    if query.chars().count() <= MAX_SEARCH_QUERY_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("search_length");
        err.message = Some("Search query must be at most 100 characters".into());
        Err(err)
    }
}

/// Validates the length of an invitation personal message.
pub fn validate_personal_message(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() <= MAX_PERSONAL_MESSAGE_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("personal_message_length");
        err.message = Some("Personal message must be at most 2000 characters".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }

    #[test]
    fn test_validate_email_address() {
        assert!(validate_email_address("ta@cs.example.edu").is_ok());
        assert!(validate_email_address("  TA@CS.Example.edu ").is_ok());
        assert!(validate_email_address("").is_err());
        assert!(validate_email_address("not-an-email").is_err());
        assert!(validate_email_address("missing@").is_err());
    }

    #[test]
    fn test_validate_generated_emails() {
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            assert!(validate_email_address(&email).is_ok(), "{}", email);
        }
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("   "), None);
        assert_eq!(normalize_search_query(""), None);
        assert_eq!(normalize_search_query("  SMith "), Some("smith".to_string()));
    }

    #[test]
    fn test_validate_search_query() {
        assert!(validate_search_query("smith").is_ok());
        assert!(validate_search_query(&"a".repeat(100)).is_ok());
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_personal_message() {
        assert!(validate_personal_message("Welcome aboard!").is_ok());
        assert!(validate_personal_message(&"x".repeat(2001)).is_err());
    }
}
