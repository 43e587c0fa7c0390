use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::PatientId;
use crate::forms::parse;
use crate::forms::patients::{PatientForm, PatientsQuery};
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, page_error, redirect, render_template,
};
use crate::services::patients as patient_service;

#[get("/patients")]
pub async fn patients(
    query: web::Query<PatientsQuery>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match patient_service::list_patients(
        query.into_inner(),
        server_config.items_per_page,
        &session.user,
        &repo,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "patients", &server_config);
    context.insert("data", &data);
    render_template(&tera, "patients/index.html", &context)
}

#[get("/patients/new")]
pub async fn new_patient(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match patient_service::load_patient_form(None, &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "patients", &server_config);
    context.insert("data", &data);
    render_template(&tera, "patients/form.html", &context)
}

#[post("/patients/new")]
pub async fn create_patient(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: PatientForm = match parse(&body) {
        Ok(form) => form,
        Err(err) => return action_error(err.into(), "/patients/new"),
    };

    let repo = backend(&repo, &session);
    match patient_service::create_patient(form, &session.user, &repo).await {
        Ok(patient) => {
            FlashMessage::success("Paciente registrado.").send();
            redirect(&format!("/patients/{}", patient.id))
        }
        Err(err) => action_error(err, "/patients/new"),
    }
}

#[get("/patients/{patient_id}")]
pub async fn show_patient(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match patient_service::load_patient(
        patient_id.into_inner(),
        server_config.odontogram_strict,
        &session.user,
        &repo,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "patients", &server_config);
    context.insert("data", &data);
    render_template(&tera, "patients/show.html", &context)
}

#[get("/patients/{patient_id}/edit")]
pub async fn edit_patient(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match patient_service::load_patient_form(
        Some(patient_id.into_inner()),
        &session.user,
        &repo,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "patients", &server_config);
    context.insert("data", &data);
    render_template(&tera, "patients/form.html", &context)
}

#[post("/patients/{patient_id}/edit")]
pub async fn update_patient(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    body: web::Bytes,
) -> impl Responder {
    let patient_id = patient_id.into_inner();
    let back = format!("/patients/{patient_id}/edit");
    let form: PatientForm = match parse(&body) {
        Ok(form) => form,
        Err(err) => return action_error(err.into(), &back),
    };

    let repo = backend(&repo, &session);
    match patient_service::update_patient(patient_id, form, &session.user, &repo).await {
        Ok(_) => {
            FlashMessage::success("Paciente actualizado.").send();
            redirect(&format!("/patients/{patient_id}"))
        }
        Err(err) => action_error(err, &back),
    }
}

#[post("/patients/{patient_id}/deactivate")]
pub async fn deactivate_patient(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    set_active(patient_id.into_inner(), false, &session, &repo).await
}

#[post("/patients/{patient_id}/activate")]
pub async fn activate_patient(
    patient_id: web::Path<PatientId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    set_active(patient_id.into_inner(), true, &session, &repo).await
}

async fn set_active(
    patient_id: PatientId,
    active: bool,
    session: &ClinicSession,
    repo: &RestRepository,
) -> actix_web::HttpResponse {
    let back = format!("/patients/{patient_id}");
    let repo = backend(repo, session);
    match patient_service::set_patient_active(patient_id, active, &session.user, &repo).await {
        Ok(()) => {
            let message = if active {
                "Paciente reactivado."
            } else {
                "Paciente dado de baja."
            };
            FlashMessage::success(message).send();
            redirect(&back)
        }
        Err(err) => action_error(err, &back),
    }
}
