use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::user::errors::FieldError;

pub(crate) const TEXT_MAX: usize = 255;
pub(crate) const ADDRESS_MAX: usize = 500;
pub(crate) const EMAIL_MAX: usize = 254;
pub(crate) const PASSWORD_MIN: usize = 5;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+7|8)\d{10}$").expect("phone pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

// Lengths are counted in characters, matching VARCHAR semantics.
pub(crate) fn max_chars(
    violations: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max: usize,
) {
    let actual = value.chars().count();
    if actual > max {
        violations.push(FieldError::TooLong { field, max, actual });
    }
}

pub(crate) fn exact_chars(
    violations: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    allowed: &'static [usize],
) {
    let actual = value.chars().count();
    if !allowed.contains(&actual) {
        violations.push(FieldError::InvalidLength {
            field,
            allowed,
            actual,
        });
    }
}

pub(crate) fn required_text(
    violations: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max: usize,
) {
    if value.trim().is_empty() {
        violations.push(FieldError::Empty { field });
    } else {
        max_chars(violations, field, value, max);
    }
}

pub(crate) fn phone(violations: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !PHONE_RE.is_match(value) {
        violations.push(FieldError::InvalidPhone { field });
    }
}

/// RFC 5322 syntax plus an ASCII local part and a dotted domain.
pub(crate) fn email(violations: &mut Vec<FieldError>, field: &'static str, value: &str) {
    let well_formed =
        email_address::EmailAddress::from_str(value).is_ok() && EMAIL_RE.is_match(value);

    if !well_formed {
        violations.push(FieldError::InvalidEmail {
            field,
            value: value.to_string(),
        });
    } else {
        max_chars(violations, field, value, EMAIL_MAX);
    }
}

pub(crate) fn password(violations: &mut Vec<FieldError>, value: &str) {
    let actual = value.chars().count();
    if actual < PASSWORD_MIN {
        violations.push(FieldError::PasswordTooShort {
            min: PASSWORD_MIN,
            actual,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(f: impl FnOnce(&mut Vec<FieldError>)) -> Vec<FieldError> {
        let mut violations = Vec::new();
        f(&mut violations);
        violations
    }

    #[test]
    fn test_phone_formats() {
        for valid in ["+79991234567", "89991234567"] {
            assert!(check(|v| phone(v, "phone", valid)).is_empty(), "{}", valid);
        }
        for invalid in ["79991234567", "+7999123456", "+799912345678", "8999123456a", ""] {
            assert_eq!(
                check(|v| phone(v, "phone", invalid)),
                vec![FieldError::InvalidPhone { field: "phone" }],
                "{}",
                invalid
            );
        }
    }

    #[test]
    fn test_email_formats() {
        assert!(check(|v| email(v, "email", "user.name+tag@example.co")).is_empty());

        for invalid in ["plainaddress", "user@localhost", "user@example.c", "@example.com"] {
            assert_eq!(check(|v| email(v, "email", invalid)).len(), 1, "{}", invalid);
        }
    }

    #[test]
    fn test_lengths_count_characters() {
        // Twelve Cyrillic characters are 24 bytes.
        assert!(check(|v| exact_chars(v, "tin", "абвгдеёжзийк", &[10, 12])).is_empty());
        assert!(check(|v| max_chars(v, "kpp", "ЯЯЯЯЯЯЯЯЯ", 9)).is_empty());
        assert_eq!(check(|v| max_chars(v, "kpp", "1234567890", 9)).len(), 1);
    }

    #[test]
    fn test_password_minimum() {
        assert!(check(|v| password(v, "12345")).is_empty());
        assert_eq!(
            check(|v| password(v, "1234")),
            vec![FieldError::PasswordTooShort { min: 5, actual: 4 }]
        );
    }
}
