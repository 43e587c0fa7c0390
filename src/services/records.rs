//! Clinical records: the detail editor, follow-ups and deletion.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::capabilities::Capability;
use crate::domain::catalog::{ClinicalCatalog, TreatmentKind};
use crate::domain::clinical_record::{
    ClinicalRecord, NewClinicalRecord, NewFollowUp, UpdateFollowUp,
};
use crate::domain::patient::Patient;
use crate::domain::treatment_plan::{PlanWarning, TreatmentPlan};
use crate::domain::types::{ClinicalNote, ClinicalRecordId, FollowUpId, PatientId};
use crate::dto::records::{DraftOutcome, RecordEditorData, RecordPageData};
use crate::forms::records::{DraftAction, FollowUpForm, RecordForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    CatalogReader, ClinicalRecordReader, ClinicalRecordWriter, PatientReader, PaymentReader,
};
use crate::services::payments::record_payment_plan;
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Treatments, surfaces and teeth as currently defined in the backend.
pub async fn load_clinical_catalog<R>(repo: &R) -> ServiceResult<ClinicalCatalog>
where
    R: CatalogReader + ?Sized,
{
    let treatments = repo.list_treatments().await.map_err(|err| {
        log::error!("Failed to list treatments: {err}");
        err
    })?;
    let surfaces = repo.list_surfaces().await.map_err(|err| {
        log::error!("Failed to list tooth surfaces: {err}");
        err
    })?;
    let teeth = repo.list_teeth().await.map_err(|err| {
        log::error!("Failed to list teeth: {err}");
        err
    })?;
    Ok(ClinicalCatalog::new(treatments, surfaces, teeth))
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

async fn get_patient<R>(id: PatientId, repo: &R) -> ServiceResult<Patient>
where
    R: PatientReader + ?Sized,
{
    repo.get_patient(id)
        .await
        .map_err(|err| {
            log::error!("Failed to get patient {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

fn editor_data(
    patient: Patient,
    record_id: Option<ClinicalRecordId>,
    description: String,
    finalized: bool,
    plan: &TreatmentPlan<'_>,
    catalog: &ClinicalCatalog,
    warning: Option<String>,
) -> RecordEditorData {
    let mut teeth = catalog.teeth.clone();
    teeth.sort_by_key(|tooth| tooth.code);

    RecordEditorData {
        patient,
        record_id,
        description,
        finalized,
        details: plan.details().to_vec(),
        lock: plan.lock(),
        selectable_treatments: plan.selectable_treatments().into_iter().cloned().collect(),
        teeth,
        surfaces: catalog.surfaces.surfaces().to_vec(),
        consultation_id: catalog.treatments.id_of(TreatmentKind::Consultation),
        warning,
    }
}

/// Loads a record with its follow-ups, and its payment plan when the user
/// handles payments.
pub async fn load_record<R>(
    id: ClinicalRecordId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<RecordPageData>
where
    R: ClinicalRecordReader + CatalogReader + PaymentReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let record = get_record(id, repo).await?;

    let payment_plan = if user.can(Capability::ManagePayments) {
        Some(record_payment_plan(&record, repo).await?)
    } else {
        None
    };

    Ok(RecordPageData {
        record,
        payment_plan,
        can_edit: user.can(Capability::ManageRecords),
    })
}

/// Opens the editor, empty for a new record or with the details of `record_id`.
pub async fn open_editor<R>(
    patient_id: PatientId,
    record_id: Option<ClinicalRecordId>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<RecordEditorData>
where
    R: PatientReader + ClinicalRecordReader + CatalogReader + ?Sized,
{
    ensure_capability(user, Capability::ManageRecords)?;

    let patient = get_patient(patient_id, repo).await?;
    let catalog = load_clinical_catalog(repo).await?;

    let (description, finalized, details) = match record_id {
        Some(id) => {
            let record = get_record(id, repo).await?;
            if record.patient_id != patient_id {
                return Err(ServiceError::NotFound);
            }
            (record.description, record.finalized, record.details)
        }
        None => (String::new(), false, Vec::new()),
    };

    let plan = TreatmentPlan::new(&catalog, details);
    Ok(editor_data(
        patient,
        record_id,
        description,
        finalized,
        &plan,
        &catalog,
        None,
    ))
}

/// Handles a post of the record editor.
///
/// The details carried by the form are replayed through the locking policy
/// first, so a tampered form is rejected before anything else happens. Add
/// and remove re-render the editor; a rejected addition leaves the draft
/// untouched and comes back as a warning. Save persists the record, with
/// the user as its dentist; saving an empty draft re-renders it with a
/// warning. An existing record must belong to `patient_id`.
pub async fn submit_record<R>(
    patient_id: PatientId,
    record_id: Option<ClinicalRecordId>,
    form: RecordForm,
    today: NaiveDate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<DraftOutcome>
where
    R: PatientReader + CatalogReader + ClinicalRecordReader + ClinicalRecordWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageRecords)?;

    if let Some(id) = record_id {
        let existing = get_record(id, repo).await?;
        if existing.patient_id != patient_id {
            log::warn!("Clinical record {id} does not belong to patient {patient_id}");
            return Err(ServiceError::NotFound);
        }
    }

    let catalog = load_clinical_catalog(repo).await?;
    let candidates = form.candidates().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;
    let mut plan = TreatmentPlan::from_candidates(&catalog, &candidates).map_err(|warning| {
        log::warn!("Rejected submitted treatment details: {warning}");
        warning
    })?;

    let action = form.action();
    if action == DraftAction::Save && !plan.details().is_empty() {
        let note = form.note()?;
        let details = plan.into_details()?;
        let record = NewClinicalRecord::new(
            patient_id,
            user.id,
            note,
            form.is_finalized(),
            details,
            today,
        );
        let saved = match record_id {
            Some(id) => repo.update_record(id, &record).await.map_err(|err| {
                log::error!("Failed to update clinical record {id}: {err}");
                err
            })?,
            None => repo.create_record(&record).await.map_err(|err| {
                log::error!("Failed to create clinical record: {err}");
                err
            })?,
        };
        return Ok(DraftOutcome::Saved(saved));
    }

    let warning = match action {
        DraftAction::Add => {
            let candidate = form.new_candidate()?;
            plan.add(candidate).err().map(|warning| warning.to_string())
        }
        DraftAction::Remove(index) => {
            plan.remove(index);
            None
        }
        DraftAction::Save => Some(PlanWarning::Empty.to_string()),
    };

    let patient = get_patient(patient_id, repo).await?;
    let description = form.description.trim().to_string();
    Ok(DraftOutcome::Editing(Box::new(editor_data(
        patient,
        record_id,
        description,
        form.is_finalized(),
        &plan,
        &catalog,
        warning,
    ))))
}

pub async fn delete_record<R>(
    id: ClinicalRecordId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ClinicalRecordWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageRecords)?;

    repo.delete_record(id).await.map_err(|err| {
        log::error!("Failed to delete clinical record {id}: {err}");
        err
    })?;

    Ok(())
}

pub async fn add_follow_up<R>(
    record_id: ClinicalRecordId,
    form: FollowUpForm,
    now: DateTime<Utc>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ClinicalRecordWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageRecords)?;

    let description = ClinicalNote::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let follow_up = NewFollowUp {
        record_id,
        dentist_id: user.id,
        description,
        date: now,
    };
    repo.create_follow_up(&follow_up).await.map_err(|err| {
        log::error!("Failed to add a follow-up to record {record_id}: {err}");
        err
    })?;

    Ok(())
}

/// Edits a follow-up; the note is re-attributed to the editing dentist.
pub async fn update_follow_up<R>(
    record_id: ClinicalRecordId,
    id: FollowUpId,
    form: FollowUpForm,
    now: DateTime<Utc>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ClinicalRecordWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageRecords)?;

    let description = ClinicalNote::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let update = UpdateFollowUp {
        dentist_id: user.id,
        description,
        date: now,
    };
    repo.update_follow_up(record_id, id, &update)
        .await
        .map_err(|err| {
            log::error!("Failed to update follow-up {id} of record {record_id}: {err}");
            err
        })?;

    Ok(())
}
