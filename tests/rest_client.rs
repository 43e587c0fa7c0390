//! `RestRepository` against a stub of the clinic backend.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::json;

use dental_admin::domain::staff::Credentials;
use dental_admin::domain::types::{PatientId, ScheduleSlotId, Username};
use dental_admin::repository::errors::RepositoryError;
use dental_admin::repository::{
    AppointmentReader, AppointmentWriter, AuthApi, PatientReader, RestRepository,
};

const TOKEN: &str = "access-token";

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn patients(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().json(json!({"detail": "Token inválido"}));
    }
    if req.query_string() == "page=2" {
        return HttpResponse::Ok().json(json!({
            "count": 3,
            "next": null,
            "previous": "http://backend/api/pacientes/",
            "results": [
                {"id": 3, "nombre": "Sofía", "apellido": "Ríos", "dni": "41222333"}
            ]
        }));
    }
    HttpResponse::Ok().json(json!({
        "count": 3,
        "next": "http://backend/api/pacientes/?page=2",
        "previous": null,
        "results": [
            {"id": 1, "nombre": "Ana", "apellido": "Pérez", "dni": 30123456},
            {"id": 2, "nombre": "Luis", "apellido": "Núñez", "dni": "28999111", "activo": false}
        ]
    }))
}

async fn patient(req: HttpRequest, path: web::Path<i32>) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    match path.into_inner() {
        1 => HttpResponse::Ok().json(json!({"id": 1, "nombre": "Ana", "apellido": "Pérez", "dni": 30123456})),
        _ => HttpResponse::NotFound().json(json!({"detail": "No encontrado."})),
    }
}

async fn slots() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {"id": 2, "hora": "10:30:00"},
        {"id": 1, "hora": "09:00:00"}
    ]))
}

async fn delete_slot() -> HttpResponse {
    HttpResponse::InternalServerError().body("ProtectedError")
}

async fn login(body: web::Json<serde_json::Value>) -> HttpResponse {
    if body["password"] == "secreta" {
        HttpResponse::Ok().json(json!({"access": TOKEN, "refresh": "refresh-token"}))
    } else {
        HttpResponse::Unauthorized().json(json!({"detail": "Credenciales inválidas"}))
    }
}

async fn start_backend() -> SocketAddr {
    let server = HttpServer::new(|| {
        App::new().service(
            web::scope("/api")
                .route("/pacientes/", web::get().to(patients))
                .route("/pacientes/{id}/", web::get().to(patient))
                .route("/turnos/horarios/", web::get().to(slots))
                .route("/turnos/horarios/{id}/", web::delete().to(delete_slot))
                .route("/personal/auth/login/", web::post().to(login)),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    addr
}

fn client(addr: SocketAddr) -> RestRepository {
    RestRepository::new(&format!("http://{addr}/api/"), Duration::from_secs(5)).unwrap()
}

#[actix_web::test]
async fn paged_list_is_decoded_with_bearer_token() {
    let addr = start_backend().await;
    let repo = client(addr).with_token(TOKEN);

    let patients = repo.list_patients().await.unwrap();

    assert_eq!(patients[0].dni, "30123456");
    assert!(patients[0].active);
    assert!(!patients[1].active);
}

#[actix_web::test]
async fn every_page_of_a_list_is_read() {
    let addr = start_backend().await;
    let repo = client(addr).with_token(TOKEN);

    let patients = repo.list_patients().await.unwrap();

    assert_eq!(
        patients.iter().map(|p| p.id.get()).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[actix_web::test]
async fn list_longer_than_the_page_limit_fails() {
    let addr = start_backend().await;
    let repo = client(addr).with_max_list_pages(1).with_token(TOKEN);

    let result = repo.list_patients().await;

    assert!(matches!(result, Err(RepositoryError::Unexpected(_))));
}

#[actix_web::test]
async fn missing_token_maps_to_unauthorized() {
    let addr = start_backend().await;

    let result = client(addr).list_patients().await;

    assert!(matches!(result, Err(RepositoryError::Unauthorized)));
}

#[actix_web::test]
async fn not_found_becomes_none() {
    let addr = start_backend().await;
    let repo = client(addr).with_token(TOKEN);

    let found = repo.get_patient(PatientId::new(1).unwrap()).await.unwrap();
    let missing = repo.get_patient(PatientId::new(9).unwrap()).await.unwrap();

    assert_eq!(found.map(|p| p.first_name), Some("Ana".to_string()));
    assert!(missing.is_none());
}

#[actix_web::test]
async fn plain_list_is_sorted_by_time() {
    let addr = start_backend().await;

    let slots = client(addr).list_slots().await.unwrap();

    assert_eq!(
        slots.iter().map(|slot| slot.label()).collect::<Vec<_>>(),
        vec!["09:00", "10:30"]
    );
}

#[actix_web::test]
async fn failed_delete_means_in_use() {
    let addr = start_backend().await;

    let result = client(addr)
        .delete_slot(ScheduleSlotId::new(1).unwrap())
        .await;

    assert!(matches!(result, Err(RepositoryError::InUse(_))));
}

#[actix_web::test]
async fn login_returns_token_pair() {
    let addr = start_backend().await;
    let repo = client(addr);

    let tokens = repo
        .login(&Credentials {
            username: Username::new("lgomez").unwrap(),
            password: "secreta".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(tokens.access, TOKEN);

    let rejected = repo
        .login(&Credentials {
            username: Username::new("lgomez").unwrap(),
            password: "otra".to_string(),
        })
        .await;
    assert!(matches!(rejected, Err(RepositoryError::Unauthorized)));
}

#[actix_web::test]
async fn unreachable_backend_is_a_network_error() {
    let repo = RestRepository::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();

    let result = repo.list_statuses().await;

    assert!(matches!(result, Err(RepositoryError::Network(_))));
}
