//! Input validation helpers
//!
//! Centralized text/number limits and validation functions.
//! SQLite TEXT has no built-in length enforcement, so lengths are checked
//! here before anything reaches a repository.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: restaurant, user, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Review comments
pub const MAX_COMMENT_LEN: usize = 500;

/// Largest seat pool a single restaurant may declare
pub const MAX_CHAIR_AMOUNT: i64 = 10_000;

/// Largest party size a single reservation may request
pub const MAX_DINERS: i64 = 500;

// ── Validation helpers (handlers) ───────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate an optional string against the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate a positive integer within an upper bound.
pub fn validate_positive(value: i64, field: &str, max: i64) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::validation(format!("{field} must be positive")));
    }
    if value > max {
        return Err(AppError::validation(format!("{field} exceeds limit {max}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized_text() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("La Perla", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn positive_bounds() {
        assert!(validate_positive(0, "diners", MAX_DINERS).is_err());
        assert!(validate_positive(-3, "diners", MAX_DINERS).is_err());
        assert!(validate_positive(MAX_DINERS + 1, "diners", MAX_DINERS).is_err());
        assert!(validate_positive(4, "diners", MAX_DINERS).is_ok());
    }
}
