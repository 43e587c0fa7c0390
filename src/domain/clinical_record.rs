use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClinicalNote, ClinicalRecordId, FollowUpId, PatientId, StaffId, SurfaceId, ToothId,
    ToothNumber, TreatmentId,
};

/// One treatment line of a clinical record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentDetail {
    pub treatment_id: TreatmentId,
    /// Catalog id of the dental piece, required when posting the record.
    pub tooth_id: Option<ToothId>,
    /// FDI code of the dental piece.
    pub tooth: Option<ToothNumber>,
    pub surface_id: Option<SurfaceId>,
    pub treatment_name: Option<String>,
    pub surface_name: Option<String>,
}

impl TreatmentDetail {
    /// Identity of a detail inside a record.
    pub fn key(&self) -> (TreatmentId, Option<ToothId>, Option<SurfaceId>) {
        (self.treatment_id, self.tooth_id, self.surface_id)
    }
}

/// Follow-up note (seguimiento) attached to a clinical record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUp {
    pub id: FollowUpId,
    pub record_id: ClinicalRecordId,
    pub dentist_id: Option<StaffId>,
    pub dentist_name: Option<String>,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFollowUp {
    pub record_id: ClinicalRecordId,
    pub dentist_id: StaffId,
    pub description: ClinicalNote,
    pub date: DateTime<Utc>,
}

/// Edits re-attribute the note to the editing dentist and bump its date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateFollowUp {
    pub dentist_id: StaffId,
    pub description: ClinicalNote,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicalRecord {
    pub id: ClinicalRecordId,
    pub patient_id: PatientId,
    pub patient_name: Option<String>,
    pub dentist_id: Option<StaffId>,
    pub dentist_name: Option<String>,
    pub description: String,
    pub finalized: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub details: Vec<TreatmentDetail>,
    pub follow_ups: Vec<FollowUp>,
}

impl ClinicalRecord {
    pub fn has_treatment(&self, treatment_id: TreatmentId) -> bool {
        self.details.iter().any(|d| d.treatment_id == treatment_id)
    }
}

/// Record contents posted on create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClinicalRecord {
    pub patient_id: PatientId,
    pub dentist_id: StaffId,
    pub description: String,
    pub finalized: bool,
    pub end_date: Option<NaiveDate>,
    pub details: Vec<TreatmentDetail>,
}

impl NewClinicalRecord {
    /// Builds the payload; a finalized record is closed on `today`.
    #[must_use]
    pub fn new(
        patient_id: PatientId,
        dentist_id: StaffId,
        description: Option<ClinicalNote>,
        finalized: bool,
        details: Vec<TreatmentDetail>,
        today: NaiveDate,
    ) -> Self {
        Self {
            patient_id,
            dentist_id,
            description: description.map(ClinicalNote::into_inner).unwrap_or_default(),
            finalized,
            end_date: finalized.then_some(today),
            details,
        }
    }
}
