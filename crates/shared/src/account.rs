//! Account sign-up form and its local validation rules.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::protocol::SignupRequest;

pub const USERNAME_LEN: RangeInclusive<usize> = 3..=20;
pub const PASSWORD_LEN: RangeInclusive<usize> = 8..=20;
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("username and password are required")]
    MissingField,
    #[error("username must be 3 to 20 characters")]
    UsernameLength,
    #[error("password must be 8 to 20 characters")]
    PasswordLength,
    #[error("password must contain at least one letter, one digit and one symbol")]
    PasswordComposition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks run in a fixed order and report the first failure only.
    pub fn validate(&self) -> Result<(), SignupError> {
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            return Err(SignupError::MissingField);
        }
        if !USERNAME_LEN.contains(&self.username.chars().count()) {
            return Err(SignupError::UsernameLength);
        }
        if !PASSWORD_LEN.contains(&self.password.chars().count()) {
            return Err(SignupError::PasswordLength);
        }

        let has_letter = self.password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = self.password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = self.password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
        if !(has_letter && has_digit && has_symbol) {
            return Err(SignupError::PasswordComposition);
        }
        Ok(())
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}
