use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::profile::{PasswordForm, ProfileForm};
use crate::models::auth::{AuthenticatedUser, ClinicSession};
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, page_error, redirect, render_template,
};
use crate::services::profile as profile_service;

#[get("/profile")]
pub async fn profile(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    let data = match profile_service::load_profile(&session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "profile", &server_config);
    context.insert("data", &data);
    render_template(&tera, "profile/index.html", &context)
}

#[post("/profile")]
pub async fn update_profile(
    clinic_session: ClinicSession,
    session: Session,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    let repo = backend(&repo, &clinic_session);
    match profile_service::update_profile(form, &clinic_session.user, &repo).await {
        Ok(member) => {
            let refreshed =
                ClinicSession::new(clinic_session.tokens, AuthenticatedUser::from(&member));
            if let Err(err) = refreshed.store(&session) {
                log::error!("Failed to refresh the clinic session: {err}");
            }
            FlashMessage::success("Perfil actualizado.").send();
            redirect("/profile")
        }
        Err(err) => action_error(err, "/profile"),
    }
}

#[post("/profile/password")]
pub async fn change_password(
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<PasswordForm>,
) -> impl Responder {
    let repo = backend(&repo, &session);
    match profile_service::change_password(form, &session.user, &repo).await {
        Ok(()) => {
            FlashMessage::success("Contraseña actualizada.").send();
            redirect("/profile")
        }
        Err(err) => action_error(err, "/profile"),
    }
}
