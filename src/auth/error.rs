use std::fmt;

use thiserror::Error;

use super::repo::StoreError;
use super::validation::FieldError;

/// The one message shown for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Which unique field a signup collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Email,
    Username,
}

impl Conflict {
    pub fn message(self) -> &'static str {
        match self {
            Conflict::Email => "Email already registered",
            Conflict::Username => "Username already taken",
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Conflict(Conflict),
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(c) => AuthError::Conflict(c),
            other => AuthError::Store(other),
        }
    }
}

impl AuthError {
    /// True for failures the user cannot fix by editing the form.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::Internal(_))
    }
}
