use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::ClinicalRecordId;
use crate::forms::payments::TogglePaymentForm;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, page_error, redirect, render_template,
};
use crate::services::payments as payment_service;

#[get("/records/{record_id}/payments")]
pub async fn payment_plan(
    record_id: web::Path<ClinicalRecordId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data =
        match payment_service::load_payment_plan(record_id.into_inner(), &session.user, &repo)
            .await
        {
            Ok(data) => data,
            Err(err) => return page_error(err),
        };

    let mut context = base_context(&flash_messages, &session.user, "payments", &server_config);
    context.insert("data", &data);
    render_template(&tera, "payments/plan.html", &context)
}

#[post("/records/{record_id}/payments")]
pub async fn toggle_payment(
    record_id: web::Path<ClinicalRecordId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<TogglePaymentForm>,
) -> impl Responder {
    let record_id = record_id.into_inner();
    let back = format!("/records/{record_id}/payments");
    let repo = backend(&repo, &session);
    match payment_service::toggle_plan_row(record_id, form, &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Pago actualizado.").send();
            redirect(&back)
        }
        Err(err) => action_error(err, &back),
    }
}
