//! Field rules for the signup and login forms.
//!
//! Every failing rule of a field is reported, except that an empty required
//! field only reports that it is required.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::dto::{LoginForm, SignupForm};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;
const EMAIL_MAX: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Signup input that passed validation. Username trimmed, email normalized.
#[derive(Debug)]
pub struct ValidSignup<'a> {
    pub username: String,
    pub email: String,
    pub password: &'a str,
}

#[derive(Debug)]
pub struct ValidLogin<'a> {
    pub email: String,
    pub password: &'a str,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= EMAIL_MAX && EMAIL_RE.is_match(email)
}

fn is_valid_username_charset(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Trim and lowercase an email for lookup and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_email(raw: &str, errors: &mut Vec<FieldError>) -> String {
    let email = normalize_email(raw);
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }
    email
}

pub fn validate_signup(form: &SignupForm) -> Result<ValidSignup<'_>, Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = form.username.trim().to_string();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    } else {
        let len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            errors.push(FieldError::new("username", "Username must be 3-20 characters"));
        }
        if !is_valid_username_charset(&username) {
            errors.push(FieldError::new(
                "username",
                "Username can only contain letters, numbers, and underscores",
            ));
        }
    }

    let email = check_email(&form.email, &mut errors);

    let password = form.password.as_str();
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else {
        if password.chars().count() < PASSWORD_MIN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            errors.push(FieldError::new(
                "password",
                "Password must contain at least one letter and one number",
            ));
        }
    }

    if form.confirm_password.is_empty() {
        errors.push(FieldError::new(
            "confirmPassword",
            "Please confirm your password",
        ));
    } else if form.confirm_password != form.password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }

    if errors.is_empty() {
        Ok(ValidSignup {
            username,
            email,
            password,
        })
    } else {
        Err(errors)
    }
}

/// Login only checks email syntax and password presence.
pub fn validate_login(form: &LoginForm) -> Result<ValidLogin<'_>, Vec<FieldError>> {
    let mut errors = Vec::new();
    let email = check_email(&form.email, &mut errors);
    if form.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if errors.is_empty() {
        Ok(ValidLogin {
            email,
            password: &form.password,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    fn messages(errors: &[FieldError], field: &str) -> Vec<&'static str> {
        errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn valid_signup_is_normalized() {
        let form = signup("  alice01 ", "ALICE@Test.com ", "abc123", "abc123");
        let valid = validate_signup(&form).unwrap();
        assert_eq!(valid.username, "alice01");
        assert_eq!(valid.email, "alice@test.com");
        assert_eq!(valid.password, "abc123");
    }

    #[test]
    fn short_password_reports_minimum_length() {
        let form = signup("alice01", "alice@test.com", "short", "short");
        let errors = validate_signup(&form).unwrap_err();
        let pw = messages(&errors, "password");
        assert!(pw.contains(&"Password must be at least 6 characters"));
        assert!(pw.contains(&"Password must contain at least one letter and one number"));
    }

    #[test]
    fn password_needs_letter_and_digit() {
        for pw in ["abcdefg", "1234567"] {
            let errors = validate_signup(&signup("bob_1", "b@x.io", pw, pw)).unwrap_err();
            assert_eq!(
                messages(&errors, "password"),
                vec!["Password must contain at least one letter and one number"]
            );
        }
    }

    #[test]
    fn username_rules() {
        let errors = validate_signup(&signup("ab", "a@b.co", "abc123", "abc123")).unwrap_err();
        assert_eq!(
            messages(&errors, "username"),
            vec!["Username must be 3-20 characters"]
        );

        let errors =
            validate_signup(&signup("bad name!", "a@b.co", "abc123", "abc123")).unwrap_err();
        assert_eq!(
            messages(&errors, "username"),
            vec!["Username can only contain letters, numbers, and underscores"]
        );

        let long = "a".repeat(21);
        assert!(validate_signup(&signup(&long, "a@b.co", "abc123", "abc123")).is_err());
        let max = "a".repeat(20);
        assert!(validate_signup(&signup(&max, "a@b.co", "abc123", "abc123")).is_ok());
    }

    #[test]
    fn empty_fields_only_report_required() {
        let errors = validate_signup(&signup("", "", "", "")).unwrap_err();
        assert_eq!(
            errors.iter().map(|e| e.message).collect::<Vec<_>>(),
            vec![
                "Username is required",
                "Email is required",
                "Password is required",
                "Please confirm your password",
            ]
        );
    }

    #[test]
    fn mismatched_confirmation() {
        let errors =
            validate_signup(&signup("carol", "c@x.io", "abc123", "abc124")).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("confirmPassword", "Passwords do not match")]);
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn login_checks_presence_only() {
        let form = LoginForm {
            email: "Alice@Test.com".into(),
            password: "x".into(),
        };
        let valid = validate_login(&form).unwrap();
        assert_eq!(valid.email, "alice@test.com");

        let form = LoginForm {
            email: "nope".into(),
            password: String::new(),
        };
        let errors = validate_login(&form).unwrap_err();
        assert_eq!(errors[0].message, "Please provide a valid email");
        assert_eq!(errors[1].message, "Password is required");
    }
}
