use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::dto::dashboard::DashboardQuery;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{backend, base_context, now, page_error, redirect, render_template};
use crate::services::dashboard::load_dashboard;

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/dashboard")
}

#[get("/dashboard")]
pub async fn dashboard(
    query: web::Query<DashboardQuery>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match load_dashboard(query.into_inner(), now().date(), &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "dashboard", &server_config);
    context.insert("data", &data);
    render_template(&tera, "main/dashboard.html", &context)
}

/// Shown when the user's role does not grant the requested page.
#[get("/na")]
pub async fn not_assigned(
    session: ClinicSession,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &session.user, "na", &server_config);
    render_template(&tera, "main/not_assigned.html", &context)
}
