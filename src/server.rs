use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::api::api_scope;
use crate::routes::appointments::{
    appointments, create_appointment, create_slot, delete_appointment, delete_slot,
    edit_appointment, new_appointment, schedule, update_appointment, update_slot,
};
use crate::routes::audit::{appointment_audit, export_payment_audit, payment_audit};
use crate::routes::auth::{
    forgot_password, login, logout, reset_password, session_expired, show_forgot_password,
    show_login, show_reset_password,
};
use crate::routes::catalogs::{
    catalog, catalogs_index, create_catalog_item, delete_catalog_item, rename_catalog_item,
};
use crate::routes::main::{dashboard, index, not_assigned};
use crate::routes::patients::{
    activate_patient, create_patient, deactivate_patient, edit_patient, new_patient, patients,
    show_patient, update_patient,
};
use crate::routes::payments::{payment_plan, toggle_payment};
use crate::routes::profile::{change_password, profile, update_profile};
use crate::routes::records::{
    add_follow_up, create_record, delete_record, edit_record, new_record, show_record,
    update_follow_up, update_record,
};
use crate::routes::staff::{
    activate_staff, create_staff, deactivate_staff, delete_staff, edit_staff, new_staff, staff,
    update_staff,
};

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // One shared client; handlers attach the user's token per request.
    let repo = RestRepository::new(
        &server_config.api_base_url,
        Duration::from_secs(server_config.api_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build the API client: {e}")))?
    .with_max_list_pages(server_config.api_max_list_pages);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving {} on {}:{} against {}",
        server_config.clinic_name,
        server_config.address,
        server_config.port,
        server_config.api_base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_login)
            .service(login)
            .service(session_expired)
            .service(show_forgot_password)
            .service(forgot_password)
            .service(show_reset_password)
            .service(reset_password)
            .service(api_scope())
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(index)
                    .service(dashboard)
                    .service(not_assigned)
                    .service(logout)
                    .service(patients)
                    .service(new_patient)
                    .service(create_patient)
                    .service(show_patient)
                    .service(edit_patient)
                    .service(update_patient)
                    .service(deactivate_patient)
                    .service(activate_patient)
                    .service(new_record)
                    .service(create_record)
                    .service(edit_record)
                    .service(update_record)
                    .service(delete_record)
                    .service(show_record)
                    .service(add_follow_up)
                    .service(update_follow_up)
                    .service(payment_plan)
                    .service(toggle_payment)
                    .service(appointments)
                    .service(new_appointment)
                    .service(create_appointment)
                    .service(edit_appointment)
                    .service(update_appointment)
                    .service(delete_appointment)
                    .service(schedule)
                    .service(create_slot)
                    .service(update_slot)
                    .service(delete_slot)
                    .service(export_payment_audit)
                    .service(payment_audit)
                    .service(appointment_audit)
                    .service(catalogs_index)
                    .service(catalog)
                    .service(create_catalog_item)
                    .service(rename_catalog_item)
                    .service(delete_catalog_item)
                    .service(staff)
                    .service(new_staff)
                    .service(create_staff)
                    .service(edit_staff)
                    .service(update_staff)
                    .service(activate_staff)
                    .service(deactivate_staff)
                    .service(delete_staff)
                    .service(profile)
                    .service(update_profile)
                    .service(change_password),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
