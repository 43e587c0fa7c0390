use reqwest::Method;

use crate::domain::clinical_record::{
    ClinicalRecord, NewClinicalRecord, NewFollowUp, UpdateFollowUp,
};
use crate::domain::types::{ClinicalRecordId, FollowUpId, PatientId};
use crate::models::clinical_record::{
    ClinicalRecord as WireClinicalRecord, NewClinicalRecord as WireNewClinicalRecord,
    NewFollowUp as WireNewFollowUp, UpdateFollowUp as WireUpdateFollowUp,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{ClinicalRecordReader, ClinicalRecordWriter, RestRepository};

const RECORDS: &str = "historias_clinicas/historias/";

impl ClinicalRecordReader for RestRepository {
    async fn list_records(&self, patient: Option<PatientId>) -> RepositoryResult<Vec<ClinicalRecord>> {
        let query: Vec<(&str, String)> = patient
            .map(|id| vec![("paciente", id.to_string())])
            .unwrap_or_default();
        let rows: Vec<WireClinicalRecord> = self.get_list(RECORDS, &query).await?;
        let records: Vec<ClinicalRecord> = convert_all(rows)?;
        // The filter parameter is not honoured by every backend version.
        Ok(records
            .into_iter()
            .filter(|record| patient.is_none_or(|id| record.patient_id == id))
            .collect())
    }

    async fn get_record(&self, id: ClinicalRecordId) -> RepositoryResult<Option<ClinicalRecord>> {
        let row: Option<WireClinicalRecord> =
            self.get_optional(&format!("{RECORDS}{id}/")).await?;
        Ok(row.map(ClinicalRecord::try_from).transpose()?)
    }
}

impl ClinicalRecordWriter for RestRepository {
    async fn create_record(&self, record: &NewClinicalRecord) -> RepositoryResult<ClinicalRecord> {
        let row: WireClinicalRecord = self
            .send(Method::POST, RECORDS, &WireNewClinicalRecord::from(record))
            .await?;
        Ok(ClinicalRecord::try_from(row)?)
    }

    async fn update_record(
        &self,
        id: ClinicalRecordId,
        record: &NewClinicalRecord,
    ) -> RepositoryResult<ClinicalRecord> {
        let row: WireClinicalRecord = self
            .send(
                Method::PATCH,
                &format!("{RECORDS}{id}/"),
                &WireNewClinicalRecord::from(record),
            )
            .await?;
        Ok(ClinicalRecord::try_from(row)?)
    }

    async fn delete_record(&self, id: ClinicalRecordId) -> RepositoryResult<()> {
        self.delete(&format!("historias_clinicas/{id}/")).await
    }

    async fn create_follow_up(&self, follow_up: &NewFollowUp) -> RepositoryResult<()> {
        self.send_discard(
            Method::POST,
            &format!("{RECORDS}{}/seguimientos/", follow_up.record_id),
            &WireNewFollowUp::from(follow_up),
        )
        .await
    }

    async fn update_follow_up(
        &self,
        record_id: ClinicalRecordId,
        id: FollowUpId,
        follow_up: &UpdateFollowUp,
    ) -> RepositoryResult<()> {
        self.send_discard(
            Method::PATCH,
            &format!("{RECORDS}{record_id}/seguimientos/{id}/"),
            &WireUpdateFollowUp::from(follow_up),
        )
        .await
    }
}
