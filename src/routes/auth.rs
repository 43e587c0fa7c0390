use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{ForgotPasswordForm, LoginForm, ResetPasswordForm};
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{public_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/login")]
pub async fn show_login(
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if ClinicSession::load(&session).is_some() {
        return redirect("/dashboard");
    }

    let context = public_context(&flash_messages, &server_config);
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    session: Session,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let clinic_session = match auth_service::login(form, repo.get_ref()).await {
        Ok(clinic_session) => clinic_session,
        Err(ServiceError::Form(msg)) => {
            FlashMessage::error(msg).send();
            return redirect("/login");
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("No se pudo conectar con el servidor.").send();
            return redirect("/login");
        }
    };

    session.renew();
    if let Err(err) = clinic_session.store(&session) {
        log::error!("Failed to store the clinic session: {err}");
        return HttpResponse::InternalServerError().finish();
    }
    if let Err(err) = Identity::login(&request.extensions(), clinic_session.user.id.to_string()) {
        log::error!("Failed to attach identity: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    log::info!("User {} logged in", clinic_session.user.id);
    redirect("/dashboard")
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>, session: Session) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    redirect("/login")
}

/// Landing point when the backend rejected the access token.
#[get("/session-expired")]
pub async fn session_expired(identity: Option<Identity>, session: Session) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    FlashMessage::warning("La sesión expiró. Ingrese nuevamente.").send();
    redirect("/login")
}

#[get("/forgot-password")]
pub async fn show_forgot_password(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = public_context(&flash_messages, &server_config);
    render_template(&tera, "auth/forgot_password.html", &context)
}

#[post("/forgot-password")]
pub async fn forgot_password(
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<ForgotPasswordForm>,
) -> impl Responder {
    match auth_service::request_password_reset(form, repo.get_ref()).await {
        Ok(()) => {
            FlashMessage::success(
                "Si el correo está registrado, recibirá un enlace para restablecer la contraseña.",
            )
            .send();
            redirect("/login")
        }
        Err(ServiceError::Form(msg)) => {
            FlashMessage::error(msg).send();
            redirect("/forgot-password")
        }
        Err(err) => {
            log::error!("Failed to request a password reset: {err}");
            FlashMessage::error("No se pudo enviar el correo de recuperación.").send();
            redirect("/forgot-password")
        }
    }
}

#[get("/reset-password/{uid}/{token}")]
pub async fn show_reset_password(
    path: web::Path<(String, String)>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (uid, token) = path.into_inner();

    let mut context = public_context(&flash_messages, &server_config);
    context.insert("uid", &uid);
    context.insert("token", &token);
    render_template(&tera, "auth/reset_password.html", &context)
}

#[post("/reset-password")]
pub async fn reset_password(
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<ResetPasswordForm>,
) -> impl Responder {
    let back = format!("/reset-password/{}/{}", form.uid, form.token);
    match auth_service::reset_password(form, repo.get_ref()).await {
        Ok(()) => {
            FlashMessage::success("Contraseña actualizada. Ya puede ingresar.").send();
            redirect("/login")
        }
        Err(ServiceError::Form(msg)) => {
            FlashMessage::error(msg).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to reset password: {err}");
            FlashMessage::error("No se pudo restablecer la contraseña.").send();
            redirect(&back)
        }
    }
}
