use thiserror::Error;

use crate::domain::user::models::UserType;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// A single broken field rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field} is required for user type {user_type}")]
    Required {
        field: &'static str,
        user_type: UserType,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be {} characters long, got {actual}", join_lengths(.allowed))]
    InvalidLength {
        field: &'static str,
        allowed: &'static [usize],
        actual: usize,
    },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must be +7XXXXXXXXXX or 8XXXXXXXXXX")]
    InvalidPhone { field: &'static str },

    #[error("{field} is not a valid email address: {value}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("password too short: minimum {min} characters, got {actual}")]
    PasswordTooShort { min: usize, actual: usize },
}

fn join_lengths(allowed: &[usize]) -> String {
    allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// All field rules a candidate record breaks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", join_violations(.0))]
pub struct ValidationError(Vec<FieldError>);

fn join_violations(violations: &[FieldError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// `Ok` when nothing was violated.
    pub fn check(violations: Vec<FieldError>) -> Result<(), ValidationError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(violations))
        }
    }

    pub fn violations(&self) -> &[FieldError] {
        &self.0
    }
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User already exists with name: {0}")]
    NameAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError::check(vec![
            FieldError::InvalidLength {
                field: "tin",
                allowed: &[10, 12],
                actual: 3,
            },
            FieldError::Empty { field: "name" },
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "tin must be 10 or 12 characters long, got 3; name must not be empty"
        );
    }

    #[test]
    fn test_check_without_violations() {
        assert!(ValidationError::check(Vec::new()).is_ok());
    }
}
