//! Page guards. Pure predicates over session presence; nothing is mutated.

use axum::response::Redirect;

use crate::session::SessionUser;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Signed-in users pass through; everyone else goes to the login page.
pub fn require_auth(user: Option<SessionUser>) -> Result<SessionUser, Redirect> {
    user.ok_or_else(|| Redirect::to(LOGIN_PATH))
}

/// Guests pass through; signed-in users go to the dashboard.
pub fn redirect_if_authenticated(user: Option<&SessionUser>) -> Result<(), Redirect> {
    match user {
        Some(_) => Err(Redirect::to(DASHBOARD_PATH)),
        None => Ok(()),
    }
}
