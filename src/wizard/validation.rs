//! Per-step field checks.
//!
//! [`validate`] is pure: it reads the form values and reports every failing
//! field of the requested step at once.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{ErrorMap, Field, FormValues};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{10,}$").expect("phone pattern compiles"));

const MIN_NAME_CHARS: usize = 3;
const MIN_USERNAME_CHARS: usize = 4;
const MIN_PASSWORD_CHARS: usize = 8;

/// Validates the fields belonging to `step` (1-based).
///
/// Steps outside 1..=3 have no rules and always yield an empty map.
pub fn validate(step: usize, values: &FormValues) -> ErrorMap {
    let mut errors = ErrorMap::new();
    match step {
        1 => validate_personal(values, &mut errors),
        2 => validate_account(values, &mut errors),
        3 => validate_preferences(values, &mut errors),
        _ => {}
    }
    errors
}

fn validate_personal(values: &FormValues, errors: &mut ErrorMap) {
    if values.full_name.trim().is_empty() {
        errors.insert(Field::FullName, "Full name is required");
    } else if char_len(&values.full_name) < MIN_NAME_CHARS {
        errors.insert(Field::FullName, "Name must be at least 3 characters");
    }

    if values.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !EMAIL_PATTERN.is_match(&values.email) {
        errors.insert(Field::Email, "Invalid email format");
    }

    if !values.phone.is_empty() && !PHONE_PATTERN.is_match(&values.phone) {
        errors.insert(Field::Phone, "Invalid phone number format");
    }
}

fn validate_account(values: &FormValues, errors: &mut ErrorMap) {
    let username = values.username.trim();
    if username.is_empty() {
        errors.insert(Field::Username, "Username is required");
    } else if char_len(username) < MIN_USERNAME_CHARS {
        errors.insert(Field::Username, "Username must be at least 4 characters");
    }

    // Whitespace counts toward the password length.
    if values.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if char_len(&values.password) < MIN_PASSWORD_CHARS {
        errors.insert(Field::Password, "Password must be at least 8 characters");
    }

    if values.confirm_password != values.password {
        errors.insert(Field::ConfirmPassword, "Passwords do not match");
    }
}

fn validate_preferences(values: &FormValues, errors: &mut ErrorMap) {
    // A plan is preselected, so this only trips on a persisted `null` plan.
    if values.plan.is_none() {
        errors.insert(Field::Plan, "Please select a plan");
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal(full_name: &str, email: &str, phone: &str) -> FormValues {
        FormValues {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            ..FormValues::default()
        }
    }

    fn account(username: &str, password: &str, confirm: &str) -> FormValues {
        FormValues {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            ..FormValues::default()
        }
    }

    #[test]
    fn short_name_is_the_only_personal_error() {
        let errors = validate(1, &personal("Jo", "a@b.com", ""));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::FullName),
            Some("Name must be at least 3 characters")
        );
    }

    #[test]
    fn blank_personal_step_reports_every_required_field() {
        let errors = validate(1, &personal("   ", "", ""));
        assert_eq!(errors.get(Field::FullName), Some("Full name is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert!(!errors.contains(Field::Phone));
    }

    #[test]
    fn email_needs_a_dot_after_the_at_sign() {
        for bad in ["plainaddress", "a@b", "a b@c.com", "a@@b.com"] {
            let errors = validate(1, &personal("Ada Lovelace", bad, ""));
            assert_eq!(
                errors.get(Field::Email),
                Some("Invalid email format"),
                "expected `{bad}` to be rejected"
            );
        }
        assert!(validate(1, &personal("Ada Lovelace", "ada@math.org", "")).is_empty());
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        let errors = validate(1, &personal("Ada Lovelace", "ada@math.org", "12345"));
        assert_eq!(errors.get(Field::Phone), Some("Invalid phone number format"));

        let errors = validate(1, &personal("Ada Lovelace", "ada@math.org", "123456789"));
        assert!(errors.contains(Field::Phone));

        let errors = validate(1, &personal("Ada Lovelace", "ada@math.org", "+1 555-000-0000"));
        assert!(errors.is_empty());

        let errors = validate(1, &personal("Ada Lovelace", "ada@math.org", "(555) 000-0000"));
        assert!(errors.contains(Field::Phone));
    }

    #[test]
    fn short_password_with_matching_confirmation() {
        let errors = validate(2, &account("abcd", "short", "short"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn mismatched_confirmation_is_the_only_account_error() {
        let errors = validate(2, &account("abcd", "password1", "password2"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords do not match"));
    }

    #[test]
    fn empty_passwords_still_require_a_password() {
        let errors = validate(2, &account("abcd", "", ""));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert!(!errors.contains(Field::ConfirmPassword));
    }

    #[test]
    fn username_length_ignores_surrounding_whitespace() {
        let errors = validate(2, &account("  abc  ", "password1", "password1"));
        assert_eq!(
            errors.get(Field::Username),
            Some("Username must be at least 4 characters")
        );
        let errors = validate(2, &account("   ", "password1", "password1"));
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
    }

    #[test]
    fn whitespace_password_counts_toward_length() {
        let errors = validate(2, &account("abcd", "        ", "        "));
        assert!(errors.is_empty());
    }

    #[test]
    fn preselected_plan_always_passes() {
        assert!(validate(3, &FormValues::default()).is_empty());
        let cleared = FormValues {
            plan: None,
            ..FormValues::default()
        };
        assert_eq!(validate(3, &cleared).get(Field::Plan), Some("Please select a plan"));
    }

    #[test]
    fn review_and_unknown_steps_have_no_rules() {
        let blank = FormValues::default();
        assert!(validate(4, &blank).is_empty());
        assert!(validate(0, &blank).is_empty());
        assert!(validate(9, &blank).is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let values = personal("J", "nope", "12");
        for step in 1..=4 {
            assert_eq!(validate(step, &values), validate(step, &values));
        }
    }
}
