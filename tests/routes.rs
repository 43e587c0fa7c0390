use std::time::Duration;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::Level;
use dental_admin::models::config::ServerConfig;
use dental_admin::repository::RestRepository;
use dental_admin::routes::api::api_scope;
use dental_admin::routes::{SESSION_EXPIRED_PATH, alert_level_to_str, redirect};

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[::core::prelude::v1::test]
fn redirect_is_see_other() {
    let response = redirect(SESSION_EXPIRED_PATH);
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        SESSION_EXPIRED_PATH
    );
}

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        api_timeout_secs: 1,
        api_max_list_pages: 10,
        clinic_name: "Consultorio".to_string(),
        items_per_page: 20,
        odontogram_strict: false,
    }
}

#[actix_web::test]
async fn api_without_session_answers_json_401() {
    let repo = RestRepository::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .app_data(web::Data::new(server_config()))
            .service(api_scope()),
    )
    .await;

    for uri in [
        "/api/v1/slots?dentist_id=2&date=2024-05-13",
        "/api/v1/patients/1/odontogram",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "session expired");
    }
}
