use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::audit::AuditQueryForm;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{action_error, backend, base_context, page_error, render_template};
use crate::services::audit as audit_service;

#[get("/audit/payments")]
pub async fn payment_audit(
    query: web::Query<AuditQueryForm>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match audit_service::payment_audit(&query, &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "audit", &server_config);
    context.insert("data", &data);
    render_template(&tera, "audit/payments.html", &context)
}

#[get("/audit/payments/export.csv")]
pub async fn export_payment_audit(
    query: web::Query<AuditQueryForm>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match audit_service::export_payment_audit(&query, &session.user, &repo).await {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition::attachment("auditoria_pagos.csv"))
            .body(csv),
        Err(err) => action_error(err, "/audit/payments"),
    }
}

#[get("/audit/appointments")]
pub async fn appointment_audit(
    query: web::Query<AuditQueryForm>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match audit_service::appointment_audit(&query, &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "audit", &server_config);
    context.insert("data", &data);
    render_template(&tera, "audit/appointments.html", &context)
}
