//! Patient list, file and form.

use crate::domain::capabilities::Capability;
use crate::domain::catalog::CatalogKind;
use crate::domain::odontogram::{OdontogramCalculator, OdontogramState, chart_layout};
use crate::domain::patient::{NewPatient, Patient};
use crate::domain::types::{PatientId, fold_name};
use crate::dto::patients::{ChartTooth, PatientFormData, PatientPageData, PatientsPageData};
use crate::forms::checkbox;
use crate::forms::patients::{PatientForm, PatientsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{
    AppointmentReader, CatalogReader, ClinicalRecordReader, PatientReader, PatientWriter,
};
use crate::services::records::load_clinical_catalog;
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Lists patients, filtered by name or DNI and paged in memory.
pub async fn list_patients<R>(
    query: PatientsQuery,
    per_page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PatientsPageData>
where
    R: PatientReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let show_inactive = checkbox(query.inactive.as_deref());

    let mut patients: Vec<Patient> = repo
        .list_patients()
        .await
        .map_err(|err| {
            log::error!("Failed to list patients: {err}");
            err
        })?
        .into_iter()
        .filter(|p| show_inactive || p.active)
        .filter(|p| search_query.as_deref().is_none_or(|q| p.matches(q)))
        .collect();
    patients.sort_by_cached_key(|p| (fold_name(&p.last_name), fold_name(&p.first_name)));

    Ok(PatientsPageData {
        patients: Paginated::from_all(patients, query.page.unwrap_or(1), per_page),
        search_query,
        show_inactive,
    })
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

/// Computes the odontogram of a patient from their whole history.
pub async fn patient_odontogram<R>(
    id: PatientId,
    strict: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<OdontogramState>
where
    R: CatalogReader + ClinicalRecordReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let catalog = load_clinical_catalog(repo).await?;
    let records = repo.list_records(Some(id)).await.map_err(|err| {
        log::error!("Failed to list records of patient {id}: {err}");
        err
    })?;

    let state = OdontogramCalculator::new(&catalog, strict)
        .compute(&records)
        .map_err(|err| {
            log::error!("Failed to compute the odontogram of patient {id}: {err}");
            err
        })?;
    Ok(state)
}

/// Loads the patient file.
pub async fn load_patient<R>(
    id: PatientId,
    strict: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PatientPageData>
where
    R: PatientReader + CatalogReader + ClinicalRecordReader + AppointmentReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let patient = get_patient(id, repo).await?;

    let catalog = load_clinical_catalog(repo).await?;
    let mut records = repo.list_records(Some(id)).await.map_err(|err| {
        log::error!("Failed to list records of patient {id}: {err}");
        err
    })?;
    let state = OdontogramCalculator::new(&catalog, strict)
        .compute(&records)
        .map_err(|err| {
            log::error!("Failed to compute the odontogram of patient {id}: {err}");
            err
        })?;
    records.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));

    let mut appointments: Vec<_> = repo
        .list_appointments()
        .await
        .map_err(|err| {
            log::error!("Failed to list appointments: {err}");
            err
        })?
        .into_iter()
        .filter(|a| a.patient_id == id)
        .collect();
    appointments.sort_by(|a, b| b.date.cmp(&a.date).then(a.slot_label.cmp(&b.slot_label)));

    let chart = chart_layout(&state)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(code, state)| ChartTooth { code, state })
                .collect()
        })
        .collect();

    Ok(PatientPageData {
        patient,
        records,
        chart,
        appointments,
    })
}

/// Select options of the patient form, with the patient when editing.
pub async fn load_patient_form<R>(
    id: Option<PatientId>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PatientFormData>
where
    R: PatientReader + CatalogReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let patient = match id {
        Some(id) => Some(get_patient(id, repo).await?),
        None => None,
    };

    let genders = repo.list_genders().await.map_err(|err| {
        log::error!("Failed to list genders: {err}");
        err
    })?;
    let antecedents = repo
        .list_catalog(CatalogKind::Antecedents)
        .await
        .map_err(|err| {
            log::error!("Failed to list antecedents: {err}");
            err
        })?;
    let functional_analyses = repo
        .list_catalog(CatalogKind::FunctionalAnalyses)
        .await
        .map_err(|err| {
            log::error!("Failed to list functional analyses: {err}");
            err
        })?;
    let insurers = repo
        .list_catalog(CatalogKind::HealthInsurers)
        .await
        .map_err(|err| {
            log::error!("Failed to list health insurers: {err}");
            err
        })?;

    Ok(PatientFormData {
        patient,
        genders,
        antecedents,
        functional_analyses,
        insurers,
    })
}

pub async fn create_patient<R>(
    form: PatientForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Patient>
where
    R: PatientWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let patient = NewPatient::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let created = repo.create_patient(&patient).await.map_err(|err| {
        log::error!("Failed to create patient: {err}");
        err
    })?;

    Ok(created)
}

pub async fn update_patient<R>(
    id: PatientId,
    form: PatientForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Patient>
where
    R: PatientWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let patient = NewPatient::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let updated = repo.update_patient(id, &patient).await.map_err(|err| {
        log::error!("Failed to update patient {id}: {err}");
        err
    })?;

    Ok(updated)
}

/// Deactivates or reactivates a patient. Patients are never deleted.
pub async fn set_patient_active<R>(
    id: PatientId,
    active: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PatientWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    repo.set_patient_active(id, active).await.map_err(|err| {
        log::error!("Failed to set patient {id} active={active}: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::catalog::fixtures::{CARIES, VESTIBULAR, catalog};
    use crate::domain::clinical_record::{ClinicalRecord, TreatmentDetail};
    use crate::domain::odontogram::Mark;
    use crate::domain::types::{ClinicalRecordId, ToothNumber};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{admin, dentist, user};

    pub(crate) fn patient(id: i32, first: &str, last: &str, dni: &str, active: bool) -> Patient {
        Patient {
            id: PatientId::new(id).expect("valid id"),
            dni: dni.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            birth_date: None,
            age: None,
            phone: None,
            email: None,
            address: None,
            gender: None,
            active,
            insurances: vec![],
            antecedents: vec![],
            functional_analyses: vec![],
        }
    }

    pub(crate) fn expect_catalog(repo: &mut MockRepository) {
        let catalog = catalog();
        let treatments = catalog.treatments.treatments().to_vec();
        let surfaces = catalog.surfaces.surfaces().to_vec();
        let teeth = catalog.teeth.clone();
        repo.expect_list_treatments()
            .returning(move || Ok(treatments.clone()));
        repo.expect_list_surfaces()
            .returning(move || Ok(surfaces.clone()));
        repo.expect_list_teeth().returning(move || Ok(teeth.clone()));
    }

    fn caries_record(id: i32, day: u32, finalized: bool) -> ClinicalRecord {
        let tooth = ToothNumber::new(11).expect("valid tooth");
        let tooth_id = catalog()
            .teeth
            .iter()
            .find(|t| t.code == tooth)
            .map(|t| t.id);
        ClinicalRecord {
            id: ClinicalRecordId::new(id).expect("valid id"),
            patient_id: PatientId::new(1).expect("valid id"),
            patient_name: None,
            dentist_id: None,
            dentist_name: None,
            description: String::new(),
            finalized,
            start_date: NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date"),
            end_date: None,
            details: vec![TreatmentDetail {
                treatment_id: crate::domain::catalog::fixtures::treatment_id(CARIES),
                tooth_id,
                tooth: Some(tooth),
                surface_id: Some(crate::domain::catalog::fixtures::surface_id(VESTIBULAR)),
                treatment_name: None,
                surface_name: None,
            }],
            follow_ups: vec![],
        }
    }

    #[actix_web::test]
    async fn list_filters_searches_and_pages() {
        let mut repo = MockRepository::new();
        repo.expect_list_patients().times(1).returning(|| {
            Ok(vec![
                patient(1, "María", "Núñez", "30123456", true),
                patient(2, "Mario", "Álvarez", "28111222", true),
                patient(3, "Marina", "Paz", "31000111", false),
                patient(4, "Ana", "Gil", "25000111", true),
            ])
        });
        let query = PatientsQuery {
            q: Some(" mar ".to_string()),
            page: None,
            inactive: None,
        };

        let data = list_patients(query, 20, &admin(), &repo)
            .await
            .expect("should list patients");

        let ids: Vec<i32> = data.patients.items.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(data.search_query.as_deref(), Some("mar"));
    }

    #[actix_web::test]
    async fn later_finalized_record_marks_zone_done() {
        let mut repo = MockRepository::new();
        expect_catalog(&mut repo);
        repo.expect_list_records()
            .withf(|patient| *patient == PatientId::new(1).ok())
            .times(1)
            .returning(|_| Ok(vec![caries_record(2, 2, true), caries_record(1, 1, false)]));

        let state = patient_odontogram(
            PatientId::new(1).expect("valid id"),
            false,
            &dentist(),
            &repo,
        )
        .await
        .expect("should compute odontogram");

        let tooth = ToothNumber::new(11).expect("valid tooth");
        assert_eq!(state[&tooth].cavities.top, Mark::Done);
    }

    #[actix_web::test]
    async fn missing_patient_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_patient().times(1).returning(|_| Ok(None));

        let result = load_patient_form(PatientId::new(9).ok(), &admin(), &repo).await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn deactivation_requires_capability() {
        let mut repo = MockRepository::new();
        repo.expect_set_patient_active().times(0);

        let result = set_patient_active(
            PatientId::new(1).expect("valid id"),
            false,
            &user(9, crate::domain::capabilities::Role::Unknown),
            &repo,
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn backend_validation_errors_reach_the_form() {
        let mut repo = MockRepository::new();
        repo.expect_create_patient().times(1).returning(|_| {
            Err(RepositoryError::Validation(
                crate::repository::errors::FieldErrors::from_body(
                    r#"{"dni": ["Ya existe un paciente con este DNI."]}"#,
                ),
            ))
        });
        let form = PatientForm {
            dni: "30123456".to_string(),
            first_name: "María".to_string(),
            last_name: "Núñez".to_string(),
            birth_date: "1990-04-02".to_string(),
            ..PatientForm::default()
        };

        let result = create_patient(form, &admin(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg.contains("Ya existe")));
    }
}
