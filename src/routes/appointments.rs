use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::{AppointmentId, ScheduleSlotId};
use crate::forms::appointments::{AppointmentForm, AppointmentsQuery, SlotForm};
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, now, page_error, redirect, render_template,
};
use crate::services::appointments as appointment_service;

#[get("/appointments")]
pub async fn appointments(
    query: web::Query<AppointmentsQuery>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match appointment_service::list_appointments(
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

    let mut context =
        base_context(&flash_messages, &session.user, "appointments", &server_config);
    context.insert("data", &data);
    render_template(&tera, "appointments/index.html", &context)
}

async fn render_form(
    id: Option<AppointmentId>,
    session: &ClinicSession,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let repo = backend(repo, session);
    let data =
        match appointment_service::load_appointment_form(id, now(), &session.user, &repo).await {
            Ok(data) => data,
            Err(err) => return page_error(err),
        };

    let mut context = base_context(flash_messages, &session.user, "appointments", server_config);
    context.insert("data", &data);
    render_template(tera, "appointments/form.html", &context)
}

#[get("/appointments/new")]
pub async fn new_appointment(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(None, &session, &repo, &flash_messages, &server_config, &tera).await
}

#[get("/appointments/{appointment_id}/edit")]
pub async fn edit_appointment(
    appointment_id: web::Path<AppointmentId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        Some(appointment_id.into_inner()),
        &session,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/appointments/new")]
pub async fn create_appointment(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<AppointmentForm>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match appointment_service::save_appointment(None, form, now(), &session.user, &repo).await {
        Ok(_) => {
            FlashMessage::success("Turno agendado.").send();
            redirect("/appointments")
        }
        Err(err) => action_error(err, "/appointments/new"),
    }
}

#[post("/appointments/{appointment_id}/edit")]
pub async fn update_appointment(
    appointment_id: web::Path<AppointmentId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<AppointmentForm>,
) -> impl Responder {
    let appointment_id = appointment_id.into_inner();
    let repo = backend(&repo, &session);
    match appointment_service::save_appointment(
        Some(appointment_id),
        form,
        now(),
        &session.user,
        &repo,
    )
    .await
    {
        Ok(_) => {
            FlashMessage::success("Turno actualizado.").send();
            redirect("/appointments")
        }
        Err(err) => action_error(err, &format!("/appointments/{appointment_id}/edit")),
    }
}

#[post("/appointments/{appointment_id}/delete")]
pub async fn delete_appointment(
    appointment_id: web::Path<AppointmentId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match appointment_service::delete_appointment(appointment_id.into_inner(), &session.user, &repo)
        .await
    {
        Ok(()) => {
            FlashMessage::success("Turno eliminado.").send();
            redirect("/appointments")
        }
        Err(err) => action_error(err, "/appointments"),
    }
}

#[get("/schedule")]
pub async fn schedule(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let slots = match appointment_service::list_schedule(&session.user, &repo).await {
        Ok(slots) => slots,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "schedule", &server_config);
    context.insert("slots", &slots);
    render_template(&tera, "appointments/schedule.html", &context)
}

#[post("/schedule")]
pub async fn create_slot(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<SlotForm>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match appointment_service::create_slot(form, &session.user, &repo).await {
        Ok(slot) => {
            FlashMessage::success(format!("Horario {} agregado.", slot.label())).send();
            redirect("/schedule")
        }
        Err(err) => action_error(err, "/schedule"),
    }
}

#[post("/schedule/{slot_id}")]
pub async fn update_slot(
    slot_id: web::Path<ScheduleSlotId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<SlotForm>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match appointment_service::update_slot(slot_id.into_inner(), form, &session.user, &repo).await
    {
        Ok(_) => {
            FlashMessage::success("Horario actualizado.").send();
            redirect("/schedule")
        }
        Err(err) => action_error(err, "/schedule"),
    }
}

#[post("/schedule/{slot_id}/delete")]
pub async fn delete_slot(
    slot_id: web::Path<ScheduleSlotId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match appointment_service::delete_slot(slot_id.into_inner(), &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Horario eliminado.").send();
            redirect("/schedule")
        }
        Err(err) => action_error(err, "/schedule"),
    }
}
