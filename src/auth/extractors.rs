use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Redirect};
use tracing::error;

use super::guards::{redirect_if_authenticated, require_auth};
use crate::{
    session::{SessionId, SessionUser},
    state::AppState,
};

/// Session resolved from the `sid` cookie. A missing, forged or expired
/// cookie yields no user.
pub struct CurrentSession {
    pub id: Option<SessionId>,
    pub user: Option<SessionUser>,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(id) = state.cookies.session_id(&parts.headers) else {
            return Ok(Self {
                id: None,
                user: None,
            });
        };

        let user = match state.sessions.get(&id).await {
            Ok(user) => user,
            Err(e) => {
                // treated as signed out
                error!(error = %e, "session lookup failed");
                None
            }
        };
        Ok(Self { id: Some(id), user })
    }
}

/// Extracts the signed-in user or redirects to `/login`.
pub struct RequireAuth(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        require_auth(current.user).map(RequireAuth)
    }
}

/// Lets only guests through; signed-in users are sent to `/dashboard`.
pub struct GuestOnly;

#[async_trait]
impl FromRequestParts<AppState> for GuestOnly {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        redirect_if_authenticated(current.user.as_ref()).map(|()| GuestOnly)
    }
}
