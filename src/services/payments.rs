//! Payment plan of a clinical record.

use crate::domain::capabilities::Capability;
use crate::domain::catalog::{TreatmentCatalog, TreatmentKind};
use crate::domain::clinical_record::ClinicalRecord;
use crate::domain::payment::{PaymentPlanRow, PaymentToggle, payment_plan, toggle_payment};
use crate::domain::types::ClinicalRecordId;
use crate::dto::payments::PaymentPlanData;
use crate::forms::payments::TogglePaymentForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CatalogReader, ClinicalRecordReader, PaymentReader, PaymentWriter};
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Plan rows of `record`, merged with the payments already registered.
pub(crate) async fn record_payment_plan<R>(
    record: &ClinicalRecord,
    repo: &R,
) -> ServiceResult<Vec<PaymentPlanRow>>
where
    R: CatalogReader + PaymentReader + ?Sized,
{
    let treatments = TreatmentCatalog::new(repo.list_treatments().await.map_err(|err| {
        log::error!("Failed to list treatments: {err}");
        err
    })?);
    let orthodontic = treatments
        .id_of(TreatmentKind::Orthodontics)
        .is_some_and(|ortho| record.has_treatment(ortho));

    let types = repo.list_payment_types().await.map_err(|err| {
        log::error!("Failed to list payment types: {err}");
        err
    })?;
    let payments = repo.list_payments(Some(record.id)).await.map_err(|err| {
        log::error!("Failed to list payments of record {}: {err}", record.id);
        err
    })?;

    Ok(payment_plan(&types, &payments, record.id, orthodontic))
}

async fn get_record<R>(id: ClinicalRecordId, repo: &R) -> ServiceResult<ClinicalRecord>
where
    R: ClinicalRecordReader + ?Sized,
{
    repo.get_record(id)
        .await
        .map_err(|err| {
            log::error!("Failed to get clinical record {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

pub async fn load_payment_plan<R>(
    record_id: ClinicalRecordId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PaymentPlanData>
where
    R: ClinicalRecordReader + CatalogReader + PaymentReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePayments)?;

    let record = get_record(record_id, repo).await?;
    let rows = record_payment_plan(&record, repo).await?;
    Ok(PaymentPlanData { record, rows })
}

/// Marks one plan row as paid or unpaid on behalf of the user.
///
/// The payment to update is looked up again in the backend; only types
/// offered by the record's plan are accepted.
pub async fn toggle_plan_row<R>(
    record_id: ClinicalRecordId,
    form: TogglePaymentForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ClinicalRecordReader + CatalogReader + PaymentReader + PaymentWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePayments)?;

    let (payment_type_id, posted_payment, paid) = form.parse().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let record = get_record(record_id, repo).await?;
    let row = record_payment_plan(&record, repo)
        .await?
        .into_iter()
        .find(|row| row.payment_type.id == payment_type_id)
        .ok_or_else(|| {
            ServiceError::Form("El tipo de pago no corresponde a esta historia clínica.".to_string())
        })?;
    if posted_payment != row.payment_id {
        log::debug!("Stale payment plan for record {record_id}, using backend state");
    }

    match toggle_payment(row.payment_id, record_id, payment_type_id, paid, user.id) {
        PaymentToggle::Update(id, update) => {
            repo.update_payment(id, &update).await.map_err(|err| {
                log::error!("Failed to update payment {id}: {err}");
                err
            })?;
        }
        PaymentToggle::Create(payment) => {
            repo.create_payment(&payment).await.map_err(|err| {
                log::error!("Failed to register payment for record {record_id}: {err}");
                err
            })?;
        }
        PaymentToggle::NoOp => {}
    }
    Ok(())
}
