use reqwest::Method;

use crate::domain::patient::{NewPatient, Patient};
use crate::domain::types::PatientId;
use crate::models::patient::{
    NewPatient as WireNewPatient, Patient as WirePatient, PatientActivity,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{PatientReader, PatientWriter, RestRepository};

impl PatientReader for RestRepository {
    async fn list_patients(&self) -> RepositoryResult<Vec<Patient>> {
        let rows: Vec<WirePatient> = self.get_list("pacientes/", &[]).await?;
        convert_all(rows)
    }

    async fn get_patient(&self, id: PatientId) -> RepositoryResult<Option<Patient>> {
        let row: Option<WirePatient> = self.get_optional(&format!("pacientes/{id}/")).await?;
        Ok(row.map(Patient::try_from).transpose()?)
    }
}

impl PatientWriter for RestRepository {
    async fn create_patient(&self, patient: &NewPatient) -> RepositoryResult<Patient> {
        let row: WirePatient = self
            .send(Method::POST, "pacientes/", &WireNewPatient::from(patient))
            .await?;
        Ok(Patient::try_from(row)?)
    }

    async fn update_patient(&self, id: PatientId, patient: &NewPatient) -> RepositoryResult<Patient> {
        let row: WirePatient = self
            .send(
                Method::PATCH,
                &format!("pacientes/{id}/"),
                &WireNewPatient::from(patient),
            )
            .await?;
        Ok(Patient::try_from(row)?)
    }

    async fn set_patient_active(&self, id: PatientId, active: bool) -> RepositoryResult<()> {
        self.send_discard(
            Method::PATCH,
            &format!("pacientes/{id}/"),
            &PatientActivity { activo: active },
        )
        .await
    }
}
