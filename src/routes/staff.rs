use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::StaffId;
use crate::dto::staff::StaffQuery;
use crate::forms::parse;
use crate::forms::staff::StaffForm;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, page_error, redirect, render_template,
};
use crate::services::staff as staff_service;

#[get("/staff")]
pub async fn staff(
    query: web::Query<StaffQuery>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match staff_service::list_staff(
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

    let mut context = base_context(&flash_messages, &session.user, "staff", &server_config);
    context.insert("data", &data);
    render_template(&tera, "staff/index.html", &context)
}

async fn render_form(
    id: Option<StaffId>,
    session: &ClinicSession,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let repo = backend(repo, session);
    let data = match staff_service::load_staff_form(id, &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(flash_messages, &session.user, "staff", server_config);
    context.insert("data", &data);
    render_template(tera, "staff/form.html", &context)
}

#[get("/staff/new")]
pub async fn new_staff(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(None, &session, &repo, &flash_messages, &server_config, &tera).await
}

#[post("/staff/new")]
pub async fn create_staff(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: StaffForm = match parse(&body) {
        Ok(form) => form,
        Err(err) => return action_error(err.into(), "/staff/new"),
    };

    let repo = backend(&repo, &session);
    match staff_service::create_staff(form, &session.user, &repo).await {
        Ok(member) => {
            FlashMessage::success(format!("{} fue dado de alta.", member.full_name())).send();
            redirect("/staff")
        }
        Err(err) => action_error(err, "/staff/new"),
    }
}

#[get("/staff/{staff_id}/edit")]
pub async fn edit_staff(
    staff_id: web::Path<StaffId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        Some(staff_id.into_inner()),
        &session,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/staff/{staff_id}/edit")]
pub async fn update_staff(
    staff_id: web::Path<StaffId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    body: web::Bytes,
) -> impl Responder {
    let staff_id = staff_id.into_inner();
    let back = format!("/staff/{staff_id}/edit");
    let form: StaffForm = match parse(&body) {
        Ok(form) => form,
        Err(err) => return action_error(err.into(), &back),
    };

    let repo = backend(&repo, &session);
    match staff_service::update_staff(staff_id, form, &session.user, &repo).await {
        Ok(_) => {
            FlashMessage::success("Datos del personal actualizados.").send();
            redirect("/staff")
        }
        Err(err) => action_error(err, &back),
    }
}

async fn set_active(
    staff_id: StaffId,
    active: bool,
    session: &ClinicSession,
    repo: &RestRepository,
) -> HttpResponse {
    let repo = backend(repo, session);
    match staff_service::set_staff_active(staff_id, active, &session.user, &repo).await {
        Ok(()) => {
            let message = if active {
                "Usuario activado."
            } else {
                "Usuario desactivado."
            };
            FlashMessage::success(message).send();
            redirect("/staff")
        }
        Err(err) => action_error(err, "/staff"),
    }
}

#[post("/staff/{staff_id}/activate")]
pub async fn activate_staff(
    staff_id: web::Path<StaffId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    set_active(staff_id.into_inner(), true, &session, &repo).await
}

#[post("/staff/{staff_id}/deactivate")]
pub async fn deactivate_staff(
    staff_id: web::Path<StaffId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    set_active(staff_id.into_inner(), false, &session, &repo).await
}

#[post("/staff/{staff_id}/delete")]
pub async fn delete_staff(
    staff_id: web::Path<StaffId>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match staff_service::delete_staff(staff_id.into_inner(), &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Usuario eliminado.").send();
            redirect("/staff")
        }
        Err(err) => action_error(err, "/staff"),
    }
}
