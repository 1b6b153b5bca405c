use std::fmt;

use serde::Deserialize;

/// Form body of `POST /auth/signup`. Missing fields decode as empty strings
/// so validation can report them.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Form body of `POST /auth/login`.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// Hand-written so passwords never reach a log line.
impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Values echoed back into a re-rendered form. Password fields are never echoed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormEcho {
    pub username: String,
    pub email: String,
}

impl From<&SignupForm> for FormEcho {
    fn from(form: &SignupForm) -> Self {
        Self {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
        }
    }
}

impl From<&LoginForm> for FormEcho {
    fn from(form: &LoginForm) -> Self {
        Self {
            username: String::new(),
            email: form.email.trim().to_string(),
        }
    }
}
