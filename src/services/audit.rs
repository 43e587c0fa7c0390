//! Payment and appointment audit logs.

use serde::Serialize;

use crate::domain::audit::{
    AppointmentAuditAction, AuditQuery, PaymentAuditAction, PaymentAuditEntry,
};
use crate::domain::capabilities::Capability;
use crate::dto::audit::{
    ActionOption, AppointmentAuditPageData, AuditFilters, PaymentAuditPageData,
};
use crate::forms::audit::AuditQueryForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{AUDIT_PAGE_SIZE, Paginated};
use crate::repository::AuditReader;
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Upper bound of pages fetched for one export.
const MAX_EXPORT_PAGES: usize = 1000;

fn filters(query: &AuditQuery) -> AuditFilters {
    AuditFilters {
        accion: query.action.clone(),
        fecha_desde: query.from.map(|d| d.to_string()),
        fecha_hasta: query.to.map(|d| d.to_string()),
        hist_clin_id: query.record_id.map(|id| id.get()),
    }
}

pub async fn payment_audit<R>(
    form: &AuditQueryForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PaymentAuditPageData>
where
    R: AuditReader + ?Sized,
{
    ensure_capability(user, Capability::ViewAudit)?;

    let query = AuditQuery::try_from(form)?;
    let (total, entries) = repo.list_payment_audit(&query).await.map_err(|err| {
        log::error!("Failed to list payment audit: {err}");
        err
    })?;

    let actions = PaymentAuditAction::ALL
        .into_iter()
        .map(|action| ActionOption {
            code: action.code(),
            label: action.label(),
            selected: query.action.as_deref() == Some(action.code()),
        })
        .collect();

    Ok(PaymentAuditPageData {
        entries: Paginated::new(entries, query.page, total, AUDIT_PAGE_SIZE),
        actions,
        filters: filters(&query),
    })
}

/// Appointment audit; the record filter does not apply here.
pub async fn appointment_audit<R>(
    form: &AuditQueryForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AppointmentAuditPageData>
where
    R: AuditReader + ?Sized,
{
    ensure_capability(user, Capability::ViewAudit)?;

    let mut query = AuditQuery::try_from(form)?;
    query.record_id = None;
    let (total, entries) = repo.list_appointment_audit(&query).await.map_err(|err| {
        log::error!("Failed to list appointment audit: {err}");
        err
    })?;

    let actions = AppointmentAuditAction::ALL
        .into_iter()
        .map(|action| ActionOption {
            code: action.code(),
            label: action.label(),
            selected: query.action.as_deref() == Some(action.code()),
        })
        .collect();

    Ok(AppointmentAuditPageData {
        entries: Paginated::new(entries, query.page, total, AUDIT_PAGE_SIZE),
        actions,
        filters: filters(&query),
    })
}

#[derive(Serialize)]
struct PaymentAuditRow<'a> {
    #[serde(rename = "Fecha")]
    date: String,
    #[serde(rename = "Acción")]
    action: &'static str,
    #[serde(rename = "Tipo de pago")]
    payment_type: &'a str,
    #[serde(rename = "Paciente")]
    patient: &'a str,
    #[serde(rename = "DNI")]
    dni: &'a str,
    #[serde(rename = "Historia clínica")]
    record: Option<i32>,
    #[serde(rename = "Usuario")]
    user: &'a str,
}

impl<'a> From<&'a PaymentAuditEntry> for PaymentAuditRow<'a> {
    fn from(entry: &'a PaymentAuditEntry) -> Self {
        Self {
            date: entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            action: entry.action.label(),
            payment_type: entry.payment_type_name.as_deref().unwrap_or_default(),
            patient: entry.patient_name.as_deref().unwrap_or_default(),
            dni: entry.patient_dni.as_deref().unwrap_or_default(),
            record: entry.record_id.map(|id| id.get()),
            user: entry.user_name.as_deref().unwrap_or_default(),
        }
    }
}

/// Every payment audit entry matching the filters, as CSV.
///
/// Pages are walked from the first one regardless of the page in `form`.
pub async fn export_payment_audit<R>(
    form: &AuditQueryForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<u8>>
where
    R: AuditReader + ?Sized,
{
    ensure_capability(user, Capability::ViewAudit)?;

    let mut query = AuditQuery::try_from(form)?;
    let mut entries: Vec<PaymentAuditEntry> = Vec::new();
    for page in 1..=MAX_EXPORT_PAGES {
        query.page = page;
        let (total, batch) = repo.list_payment_audit(&query).await.map_err(|err| {
            log::error!("Failed to list payment audit page {page}: {err}");
            err
        })?;
        let exhausted = batch.is_empty();
        entries.extend(batch);
        if exhausted || entries.len() >= total {
            break;
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in &entries {
        writer
            .serialize(PaymentAuditRow::from(entry))
            .map_err(|err| ServiceError::Internal(format!("CSV: {err}")))?;
    }
    let csv = writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(format!("CSV: {err}")))?;

    log::info!("Exported {} payment audit entries for user {}", entries.len(), user.id);
    Ok(csv)
}
