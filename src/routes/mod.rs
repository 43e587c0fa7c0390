//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::models::auth::{AuthenticatedUser, ClinicSession};
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::services::ServiceError;

pub mod api;
pub mod appointments;
pub mod audit;
pub mod auth;
pub mod catalogs;
pub mod main;
pub mod patients;
pub mod payments;
pub mod profile;
pub mod records;
pub mod staff;

pub const SESSION_EXPIRED_PATH: &str = "/session-expired";
pub const NOT_ASSIGNED_PATH: &str = "/na";
const BACKEND_ERROR: &str = "No se pudo completar la operación. Intente nuevamente.";

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

#[derive(Serialize)]
struct Alert<'a> {
    message: &'a str,
    level: &'static str,
}

/// Context of the pages shown before login.
pub fn public_context(flash_messages: &IncomingFlashMessages, server_config: &ServerConfig) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content(),
            level: alert_level_to_str(&f.level()),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("clinic_name", &server_config.clinic_name);
    context
}

/// Context shared by every page: alerts, user, navigation and clinic name.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let mut context = public_context(flash_messages, server_config);
    context.insert("current_user", user);
    context.insert("capabilities", &user.capabilities);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Backend client acting on behalf of the session's user.
pub fn backend(repo: &RestRepository, session: &ClinicSession) -> RestRepository {
    repo.with_token(session.access_token())
}

/// Response for a page that could not be loaded.
pub fn page_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::SessionExpired => redirect(SESSION_EXPIRED_PATH),
        ServiceError::Unauthorized => redirect(NOT_ASSIGNED_PATH),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(msg) | ServiceError::Warning(msg) => {
            FlashMessage::warning(msg).send();
            redirect("/dashboard")
        }
        err => {
            log::error!("Failed to load page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Flashes the outcome of a failed action and sends the user to `back`.
pub fn action_error(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::SessionExpired => return redirect(SESSION_EXPIRED_PATH),
        ServiceError::Unauthorized => return redirect(NOT_ASSIGNED_PATH),
        ServiceError::NotFound => FlashMessage::error("El elemento no existe.").send(),
        ServiceError::Form(msg) | ServiceError::InUse(msg) => FlashMessage::error(msg).send(),
        ServiceError::Warning(msg) => FlashMessage::warning(msg).send(),
        ServiceError::TypeConstraint(msg) => FlashMessage::error(msg).send(),
        ServiceError::Internal(msg) => {
            log::error!("Backend failure: {msg}");
            FlashMessage::error(BACKEND_ERROR).send();
        }
    }
    redirect(back)
}

/// JSON error body of the API endpoints.
pub fn api_error(err: ServiceError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        ServiceError::SessionExpired => HttpResponse::Unauthorized().json(body),
        ServiceError::Unauthorized => HttpResponse::Forbidden().json(body),
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Form(_) | ServiceError::Warning(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(body)
        }
        ServiceError::InUse(_) => HttpResponse::Conflict().json(body),
        ServiceError::Internal(msg) => {
            log::error!("Backend failure: {msg}");
            HttpResponse::BadGateway().json(serde_json::json!({ "error": BACKEND_ERROR }))
        }
    }
}

/// Current date and time in the clinic's time zone.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
