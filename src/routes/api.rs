//! JSON endpoints used by the pages' scripts.
//!
//! These answer 401 with a JSON body when there is no session, so the scope
//! is mounted without the login redirect.

use actix_web::{HttpResponse, Responder, Scope, get, web};

use crate::domain::types::PatientId;
use crate::dto::patients::ChartTooth;
use crate::forms::appointments::SlotsQuery;
use crate::models::auth::ClinicSession;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{api_error, backend, now};
use crate::services::{
    ServiceError, appointments as appointment_service, patients as patient_service,
};

pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(api_v1_odontogram)
        .service(api_v1_slots)
}

/// Tooth states of a patient, keyed by FDI code.
#[get("/v1/patients/{patient_id}/odontogram")]
pub async fn api_v1_odontogram(
    patient_id: web::Path<PatientId>,
    session: Option<ClinicSession>,
    repo: web::Data<RestRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Some(session) = session else {
        return api_error(ServiceError::SessionExpired);
    };
    let repo = backend(&repo, &session);
    match patient_service::patient_odontogram(
        patient_id.into_inner(),
        server_config.odontogram_strict,
        &session.user,
        &repo,
    )
    .await
    {
        Ok(state) => HttpResponse::Ok().json(
            state
                .into_iter()
                .map(|(code, state)| ChartTooth { code, state })
                .collect::<Vec<_>>(),
        ),
        Err(err) => api_error(err),
    }
}

#[get("/v1/slots")]
pub async fn api_v1_slots(
    query: web::Query<SlotsQuery>,
    session: Option<ClinicSession>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    let Some(session) = session else {
        return api_error(ServiceError::SessionExpired);
    };
    let repo = backend(&repo, &session);
    match appointment_service::free_slots(query.into_inner(), now(), &session.user, &repo).await {
        Ok(slots) => HttpResponse::Ok().json(slots),
        Err(err) => api_error(err),
    }
}
