use std::collections::HashMap;

use actix_web::{HttpResponse, http::header};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod main;
pub mod products;

/// Builds a `303 See Other` redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders `name` or logs the failure and answers with a 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Template context shared by every page: flash alerts, the current user
/// and the active navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    active_page: &str,
) -> Context {
    let alerts: Vec<(&'static str, &str)> = flash_messages
        .iter()
        .map(|message| (alert_level_to_str(message.level()), message.content()))
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("active_page", active_page);
    context
}

fn alert_level_to_str(level: Level) -> &'static str {
    match level {
        Level::Debug => "secondary",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "danger",
    }
}

/// Tera filter rendering an integer cents amount as a decimal string.
pub fn format_cents(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("cents filter expects an integer"))?;

    Ok(tera::Value::String(format!(
        "{}.{:02}",
        cents / 100,
        cents.rem_euclid(100)
    )))
}
