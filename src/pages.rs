use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::{
    auth::{
        dto::FormEcho,
        extractors::{CurrentSession, GuestOnly, RequireAuth},
    },
    state::AppState,
    views,
};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_form))
        .route("/signup", get(signup_form))
        .route("/dashboard", get(dashboard))
}

async fn home(current: CurrentSession) -> Html<String> {
    views::index(current.user.as_ref())
}

async fn login_form(_guest: GuestOnly) -> Html<String> {
    views::login_page(None, &FormEcho::default())
}

async fn signup_form(_guest: GuestOnly) -> Html<String> {
    views::signup_page(&[], &FormEcho::default())
}

async fn dashboard(RequireAuth(user): RequireAuth) -> Html<String> {
    views::dashboard(&user)
}

pub async fn not_found(current: CurrentSession) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, views::not_found(current.user.as_ref()))
}
