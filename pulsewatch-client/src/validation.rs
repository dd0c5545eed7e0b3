//! Local checks run on a signup form before it is submitted.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::ValidationError;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Minimum username length.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A signup request as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl SignupForm {
    /// Create a form whose confirmation matches the password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
        }
    }

    /// Set a confirmation that differs from the password.
    pub fn confirm(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    /// Validate every field, returning the normalized form on success.
    ///
    /// The username is trimmed and the email trimmed and lowercased. Checks
    /// run in field order and the first failure is reported.
    pub fn validate(&self) -> Result<SignupForm, ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }
        if email.is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }

        validate_username(username)?;
        validate_email(&email)?;
        validate_password(&self.password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::ConfirmationMismatch);
        }

        Ok(SignupForm {
            username: username.to_string(),
            email,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::UsernameCharset);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Check password strength: length, then upper, lower and digit classes.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_valid_form() {
        let form = SignupForm::new("  runner_42 ", " Ada@Example.COM ", "Str0ngPass");
        let valid = form.validate().unwrap();
        assert_eq!(valid.username, "runner_42");
        assert_eq!(valid.email, "ada@example.com");
    }

    #[test]
    fn rejects_missing_fields() {
        let form = SignupForm::new("", "a@b.io", "Str0ngPass");
        assert_eq!(form.validate(), Err(ValidationError::MissingField("Username")));
        let form = SignupForm::new("alice", "   ", "Str0ngPass");
        assert_eq!(form.validate(), Err(ValidationError::MissingField("Email")));
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("ab"), Err(ValidationError::UsernameTooShort));
        assert_eq!(validate_username("a-b-c"), Err(ValidationError::UsernameCharset));
        assert_eq!(validate_username("abc"), Ok(()));
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert_eq!(validate_email("no-at-sign"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b.c"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn password_rules_report_first_failure() {
        assert_eq!(validate_password("Sh0rt"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_password("alllower1"),
            Err(ValidationError::PasswordMissingUppercase)
        );
        assert_eq!(
            validate_password("ALLUPPER1"),
            Err(ValidationError::PasswordMissingLowercase)
        );
        assert_eq!(
            validate_password("NoDigitsHere"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert_eq!(validate_password("Good1Password"), Ok(()));
    }

    #[test]
    fn confirmation_must_match() {
        let form = SignupForm::new("alice", "alice@example.com", "Str0ngPass").confirm("Str0ngPas");
        assert_eq!(form.validate(), Err(ValidationError::ConfirmationMismatch));
    }
}
