use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::types::{ClinicalRecordId, FollowUpId, PatientId};
use crate::dto::records::{DraftOutcome, RecordEditorData};
use crate::forms::parse;
use crate::forms::records::{FollowUpForm, RecordForm};
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, now, page_error, redirect, render_template,
};
use crate::services::records as record_service;

fn render_editor(
    data: &RecordEditorData,
    session: &ClinicSession,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(flash_messages, &session.user, "patients", server_config);
    context.insert("data", data);
    render_template(tera, "records/editor.html", &context)
}

#[get("/records/{record_id}")]
pub async fn show_record(
    record_id: web::Path<ClinicalRecordId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match record_service::load_record(record_id.into_inner(), &session.user, &repo).await
    {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "patients", &server_config);
    context.insert("data", &data);
    render_template(&tera, "records/show.html", &context)
}

#[get("/patients/{patient_id}/records/new")]
pub async fn new_record(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match record_service::open_editor(patient_id.into_inner(), None, &session.user, &repo).await {
        Ok(data) => render_editor(&data, &session, &flash_messages, &server_config, &tera),
        Err(err) => page_error(err),
    }
}

#[get("/patients/{patient_id}/records/{record_id}/edit")]
pub async fn edit_record(
    path: web::Path<(PatientId, ClinicalRecordId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (patient_id, record_id) = path.into_inner();
    let repo = backend(&repo, &session);
    match record_service::open_editor(patient_id, Some(record_id), &session.user, &repo).await {
        Ok(data) => render_editor(&data, &session, &flash_messages, &server_config, &tera),
        Err(err) => page_error(err),
    }
}

#[allow(clippy::too_many_arguments)]
async fn submit(
    patient_id: PatientId,
    record_id: Option<ClinicalRecordId>,
    body: &[u8],
    session: &ClinicSession,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let back = match record_id {
        Some(record_id) => format!("/patients/{patient_id}/records/{record_id}/edit"),
        None => format!("/patients/{patient_id}/records/new"),
    };
    let form: RecordForm = match parse(body) {
        Ok(form) => form,
        Err(err) => return action_error(err.into(), &back),
    };

    let repo = backend(repo, session);
    let today = now().date();
    match record_service::submit_record(patient_id, record_id, form, today, &session.user, &repo)
        .await
    {
        Ok(DraftOutcome::Editing(data)) => {
            render_editor(&data, session, flash_messages, server_config, tera)
        }
        Ok(DraftOutcome::Saved(record)) => {
            FlashMessage::success("Historia clínica guardada.").send();
            redirect(&format!("/records/{}", record.id))
        }
        Err(err) => action_error(err, &back),
    }
}

#[post("/patients/{patient_id}/records/new")]
pub async fn create_record(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    submit(
        patient_id.into_inner(),
        None,
        &body,
        &session,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/patients/{patient_id}/records/{record_id}/edit")]
pub async fn update_record(
    path: web::Path<(PatientId, ClinicalRecordId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let (patient_id, record_id) = path.into_inner();
    submit(
        patient_id,
        Some(record_id),
        &body,
        &session,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/patients/{patient_id}/records/{record_id}/delete")]
pub async fn delete_record(
    path: web::Path<(PatientId, ClinicalRecordId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let (patient_id, record_id) = path.into_inner();
    let repo = backend(&repo, &session);
    match record_service::delete_record(record_id, &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Historia clínica eliminada.").send();
            redirect(&format!("/patients/{patient_id}"))
        }
        Err(err) => action_error(err, &format!("/records/{record_id}")),
    }
}

#[post("/records/{record_id}/follow-ups")]
pub async fn add_follow_up(
    record_id: web::Path<ClinicalRecordId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<FollowUpForm>,
) -> impl Responder {
    let record_id = record_id.into_inner();
    let back = format!("/records/{record_id}");
    let repo = backend(&repo, &session);
    match record_service::add_follow_up(record_id, form, Utc::now(), &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Seguimiento agregado.").send();
            redirect(&back)
        }
        Err(err) => action_error(err, &back),
    }
}

#[post("/records/{record_id}/follow-ups/{follow_up_id}")]
pub async fn update_follow_up(
    path: web::Path<(ClinicalRecordId, FollowUpId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<FollowUpForm>,
) -> impl Responder {
    let (record_id, follow_up_id) = path.into_inner();
    let back = format!("/records/{record_id}");
    let repo = backend(&repo, &session);
    match record_service::update_follow_up(
        record_id,
        follow_up_id,
        form,
        Utc::now(),
        &session.user,
        &repo,
    )
    .await
    {
        Ok(()) => {
            FlashMessage::success("Seguimiento actualizado.").send();
            redirect(&back)
        }
        Err(err) => action_error(err, &back),
    }
}
