use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{FormEcho, LoginForm, SignupForm},
        error::{AuthError, INVALID_CREDENTIALS},
        extractors::CurrentSession,
        guards::{DASHBOARD_PATH, LOGIN_PATH},
        services::AuthService,
    },
    session::{SessionCookies, SessionId},
    state::AppState,
    views,
};

const SIGNUP_SERVER_ERROR: &str = "Server error during signup";
const LOGIN_SERVER_ERROR: &str = "Server error during login";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

/// Redirect to the dashboard carrying a fresh session cookie.
fn redirect_with_session(cookies: &SessionCookies, id: &SessionId) -> Response {
    let mut headers = HeaderMap::new();
    match cookies.set_cookie(id) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(e) => {
            error!(error = %e, "failed to build session cookie");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    (headers, Redirect::to(DASHBOARD_PATH)).into_response()
}

#[instrument(skip_all)]
pub async fn signup(
    State(auth): State<AuthService>,
    State(cookies): State<SessionCookies>,
    current: CurrentSession,
    Form(form): Form<SignupForm>,
) -> Response {
    let err = match auth.signup(&form, current.id.as_ref()).await {
        Ok(established) => return redirect_with_session(&cookies, &established.session_id),
        Err(err) => err,
    };

    let (status, messages): (StatusCode, Vec<&str>) = match &err {
        AuthError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            errors.iter().map(|e| e.message).collect(),
        ),
        AuthError::Conflict(conflict) => (StatusCode::CONFLICT, vec![conflict.message()]),
        _ => {
            error!(error = %err, "signup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, vec![SIGNUP_SERVER_ERROR])
        }
    };
    (status, views::signup_page(&messages, &FormEcho::from(&form))).into_response()
}

#[instrument(skip_all)]
pub async fn login(
    State(auth): State<AuthService>,
    State(cookies): State<SessionCookies>,
    current: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let err = match auth.login(&form, current.id.as_ref()).await {
        Ok(established) => return redirect_with_session(&cookies, &established.session_id),
        Err(err) => err,
    };

    let (status, message) = match &err {
        AuthError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            errors.first().map_or(INVALID_CREDENTIALS, |e| e.message),
        ),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS),
        _ => {
            error!(error = %err, "login failed");
            (StatusCode::INTERNAL_SERVER_ERROR, LOGIN_SERVER_ERROR)
        }
    };
    (status, views::login_page(Some(message), &FormEcho::from(&form))).into_response()
}

/// Always lands on `/login`, whatever happened to the session.
#[instrument(skip_all)]
pub async fn logout(
    State(auth): State<AuthService>,
    State(cookies): State<SessionCookies>,
    current: CurrentSession,
) -> Response {
    if let Err(e) = auth.logout(current.id.as_ref()).await {
        error!(error = %e, "logout error");
    }

    let mut headers = HeaderMap::new();
    if let Ok(cookie) = cookies.clear_cookie() {
        headers.insert(SET_COOKIE, cookie);
    }
    (headers, Redirect::to(LOGIN_PATH)).into_response()
}
