//! HTML pages for the auth flows and the index
//!
//! Simple inline templates without a template engine. Rendering goes through
//! [`PageRenderer`] so the markup can be replaced without touching handlers.

use std::fmt::Debug;

use axum::response::Html;
use tower_sessions::Session;

use super::session::take_flashes;
use super::state::AppState;
use super::types::ApiError;
use crate::domain::user::User;

/// Pages the application renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Register,
    Login,
    Index,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Register => "Register",
            Self::Login => "Log In",
            Self::Index => "Home",
        }
    }
}

/// Per-request data available to every page
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub identity: Option<&'a User>,
    pub flashes: &'a [String],
}

pub trait PageRenderer: Send + Sync + Debug {
    fn render(&self, page: Page, context: &PageContext<'_>) -> String;
}

/// Default renderer producing plain HTML forms
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn nav(identity: Option<&User>) -> String {
        match identity {
            Some(user) => format!(
                r#"<li><span>{}</span></li>
        <li><a href="/auth/logout">Log Out</a></li>"#,
                html_escape(user.username())
            ),
            None => r#"<li><a href="/auth/register">Register</a></li>
        <li><a href="/auth/login">Log In</a></li>"#
                .to_string(),
        }
    }

    fn credentials_form(action: &str, submit: &str) -> String {
        format!(
            r#"<form method="post" action="{action}">
      <label for="username">Username</label>
      <input name="username" id="username" required>
      <label for="password">Password</label>
      <input type="password" name="password" id="password" required>
      <input type="submit" value="{submit}">
    </form>"#
        )
    }

    fn body(page: Page, identity: Option<&User>) -> String {
        match page {
            Page::Register => Self::credentials_form("/auth/register", "Register"),
            Page::Login => Self::credentials_form("/auth/login", "Log In"),
            Page::Index => match identity {
                Some(user) => format!("<p>Welcome, {}.</p>", html_escape(user.username())),
                None => r#"<p>Please <a href="/auth/login">log in</a> or <a href="/auth/register">register</a>.</p>"#
                    .to_string(),
            },
        }
    }
}

impl PageRenderer for HtmlRenderer {
    fn render(&self, page: Page, context: &PageContext<'_>) -> String {
        let title = page.title();
        let nav = Self::nav(context.identity);
        let flashes: String = context
            .flashes
            .iter()
            .map(|message| format!(r#"<div class="flash">{}</div>"#, html_escape(message)))
            .collect();
        let body = Self::body(page, context.identity);

        format!(
            r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - Flaskr</title>
  <style>
    .flash {{ margin: 1em 0; padding: 1em; background: #cae6f6; border: 1px solid #377ba8; }}
  </style>
</head>
<body>
  <nav>
    <h1><a href="/">Flaskr</a></h1>
    <ul>
        {nav}
    </ul>
  </nav>
  <section class="content">
    <header><h1>{title}</h1></header>
    {flashes}
    {body}
  </section>
</body>
</html>"#
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render `page` for the current request, consuming any queued notices.
pub async fn render_page(
    state: &AppState,
    session: &Session,
    identity: Option<&User>,
    page: Page,
) -> Result<Html<String>, ApiError> {
    let flashes = take_flashes(session).await?;
    let context = PageContext {
        identity,
        flashes: &flashes,
    };
    Ok(Html(state.renderer.render(page, &context)))
}
