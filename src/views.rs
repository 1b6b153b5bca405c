//! Server-rendered HTML pages.

use axum::response::Html;
use time::macros::format_description;

use crate::{auth::dto::FormEcho, session::SessionUser};

/// Escapes text for HTML element and attribute contexts.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> Html<String> {
    let nav = match user {
        Some(u) => format!(
            r#"<span>Signed in as {}</span> <a href="/dashboard">Dashboard</a> <a href="/auth/logout">Log out</a>"#,
            escape(&u.username)
        ),
        None => r#"<a href="/login">Log in</a> <a href="/signup">Sign up</a>"#.to_string(),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Gatehouse</title>
</head>
<body>
<header><a href="/">Gatehouse</a> <nav>{nav}</nav></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn error_list(messages: &[&str]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

pub fn index(user: Option<&SessionUser>) -> Html<String> {
    let body = match user {
        Some(u) => format!(
            r#"<h1>Welcome back, {}!</h1><p><a href="/dashboard">Go to your dashboard</a></p>"#,
            escape(&u.username)
        ),
        None => r#"<h1>Welcome</h1><p><a href="/signup">Create an account</a> or <a href="/login">log in</a>.</p>"#
            .to_string(),
    };
    layout("Home", user, &body)
}

pub fn login_page(error: Option<&str>, echo: &FormEcho) -> Html<String> {
    let errors = error.map(|e| error_list(&[e])).unwrap_or_default();
    let body = format!(
        r#"<h1>Log in</h1>
{errors}
<form method="post" action="/auth/login">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#,
        email = escape(&echo.email),
    );
    layout("Login", None, &body)
}

pub fn signup_page(errors: &[&str], echo: &FormEcho) -> Html<String> {
    let body = format!(
        r#"<h1>Sign up</h1>
{errors}
<form method="post" action="/auth/signup">
<label>Username <input type="text" name="username" value="{username}" required></label>
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirmPassword" required></label>
<button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        errors = error_list(errors),
        username = escape(&echo.username),
        email = escape(&echo.email),
    );
    layout("Sign Up", None, &body)
}

pub fn dashboard(user: &SessionUser) -> Html<String> {
    let since = user
        .created_at
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Dashboard</h1>
<dl>
<dt>Username</dt><dd>{username}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Member since</dt><dd>{since}</dd>
</dl>"#,
        username = escape(&user.username),
        email = escape(&user.email),
    );
    layout("Dashboard", Some(user), &body)
}

pub fn not_found(user: Option<&SessionUser>) -> Html<String> {
    layout(
        "Not Found",
        user,
        r#"<h1>Page not found</h1><p><a href="/">Back home</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(escape("plain_name"), "plain_name");
    }

    #[test]
    fn signup_page_echoes_identity_but_no_password() {
        let echo = FormEcho {
            username: "bob<b>".into(),
            email: "bob@x.io".into(),
        };
        let Html(page) = signup_page(&["Passwords do not match"], &echo);
        assert!(page.contains(r#"value="bob&lt;b&gt;""#));
        assert!(page.contains(r#"value="bob@x.io""#));
        assert!(page.contains("<li>Passwords do not match</li>"));
        assert!(!page.contains(r#"name="password" value"#));
    }

    #[test]
    fn dashboard_shows_identity() {
        let user = SessionUser {
            id: Uuid::new_v4(),
            username: "alice01".into(),
            email: "alice@test.com".into(),
            created_at: datetime!(2024-03-05 10:00 UTC),
        };
        let Html(page) = dashboard(&user);
        assert!(page.contains("<dd>alice01</dd>"));
        assert!(page.contains("<dd>alice@test.com</dd>"));
        assert!(page.contains("<dd>2024-03-05</dd>"));
        assert!(page.contains("/auth/logout"));
    }
}
