use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::catalog::CatalogKind;
use crate::domain::types::CatalogItemId;
use crate::forms::catalogs::CatalogItemForm;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{
    action_error, backend, base_context, page_error, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::catalogs as catalog_service;

fn kind_from_path(slug: &str) -> Result<CatalogKind, ServiceError> {
    CatalogKind::from_slug(slug).ok_or(ServiceError::NotFound)
}

#[get("/catalogs")]
pub async fn catalogs_index() -> impl Responder {
    redirect(&format!("/catalogs/{}", CatalogKind::Treatments.slug()))
}

#[get("/catalogs/{slug}")]
pub async fn catalog(
    slug: web::Path<String>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let kind = match kind_from_path(&slug) {
        Ok(kind) => kind,
        Err(err) => return page_error(err),
    };
    let repo = backend(&repo, &session);
    let data = match catalog_service::load_catalog(kind, &session.user, &repo).await {
        Ok(data) => data,
        Err(err) => return page_error(err),
    };

    let mut context = base_context(&flash_messages, &session.user, "catalogs", &server_config);
    context.insert("data", &data);
    render_template(&tera, "catalogs/index.html", &context)
}

fn done(kind: CatalogKind, message: &str) -> HttpResponse {
    FlashMessage::success(message).send();
    redirect(&format!("/catalogs/{}", kind.slug()))
}

#[post("/catalogs/{slug}")]
pub async fn create_catalog_item(
    slug: web::Path<String>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<CatalogItemForm>,
) -> impl Responder {
    let back = format!("/catalogs/{slug}");
    let kind = match kind_from_path(&slug) {
        Ok(kind) => kind,
        Err(err) => return action_error(err, "/catalogs"),
    };
    let repo = backend(&repo, &session);
    match catalog_service::create_catalog_item(kind, form, &session.user, &repo).await {
        Ok(()) => done(kind, "Elemento agregado."),
        Err(err) => action_error(err, &back),
    }
}

#[post("/catalogs/{slug}/{item_id}")]
pub async fn rename_catalog_item(
    path: web::Path<(String, CatalogItemId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
    web::Form(form): web::Form<CatalogItemForm>,
) -> impl Responder {
    let (slug, item_id) = path.into_inner();
    let back = format!("/catalogs/{slug}");
    let kind = match kind_from_path(&slug) {
        Ok(kind) => kind,
        Err(err) => return action_error(err, "/catalogs"),
    };
    let repo = backend(&repo, &session);
    match catalog_service::rename_catalog_item(kind, item_id, form, &session.user, &repo).await {
        Ok(()) => done(kind, "Elemento actualizado."),
        Err(err) => action_error(err, &back),
    }
}

#[post("/catalogs/{slug}/{item_id}/delete")]
pub async fn delete_catalog_item(
    path: web::Path<(String, CatalogItemId)>,
    session: ClinicSession,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let (slug, item_id) = path.into_inner();
    let back = format!("/catalogs/{slug}");
    let kind = match kind_from_path(&slug) {
        Ok(kind) => kind,
        Err(err) => return action_error(err, "/catalogs"),
    };
    let repo = backend(&repo, &session);
    match catalog_service::delete_catalog_item(kind, item_id, &session.user, &repo).await {
        Ok(()) => done(kind, "Elemento eliminado."),
        Err(err) => action_error(err, &back),
    }
}
