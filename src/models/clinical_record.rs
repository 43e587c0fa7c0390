use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::clinical_record::{
    ClinicalRecord as DomainClinicalRecord, FollowUp as DomainFollowUp,
    NewClinicalRecord as DomainNewClinicalRecord, NewFollowUp as DomainNewFollowUp,
    TreatmentDetail as DomainTreatmentDetail, UpdateFollowUp as DomainUpdateFollowUp,
};
use crate::domain::types::{
    ClinicalRecordId, FollowUpId, PatientId, StaffId, SurfaceId, ToothId, ToothNumber,
    TreatmentId, TypeConstraintError,
};
use crate::models::catalog::ToothCode;
use crate::models::fields;

#[derive(Debug, Clone, Deserialize)]
pub struct TreatmentDetail {
    pub tratamiento: i32,
    #[serde(default)]
    pub pieza_dental: Option<i32>,
    #[serde(default)]
    pub cara_dental: Option<i32>,
    #[serde(default)]
    pub tratamiento_nombre: Option<String>,
    #[serde(default)]
    pub pieza_codigo: Option<ToothCode>,
    #[serde(default)]
    pub cara_nombre: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowUp {
    pub id: i32,
    #[serde(default)]
    pub odontologo: Option<i32>,
    #[serde(default)]
    pub odontologo_nombre: Option<String>,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, deserialize_with = "fields::optional_timestamp")]
    pub fecha: Option<DateTime<Utc>>,
}

/// Wire model of [`crate::domain::clinical_record::ClinicalRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClinicalRecord {
    pub id: i32,
    pub paciente: i32,
    #[serde(default)]
    pub paciente_nombre: Option<String>,
    #[serde(default)]
    pub odontologo: Option<i32>,
    #[serde(default)]
    pub odontologo_nombre: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub finalizado: bool,
    #[serde(deserialize_with = "fields::date")]
    pub fecha_inicio: NaiveDate,
    #[serde(default, deserialize_with = "fields::optional_date")]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(default)]
    pub detalles: Vec<TreatmentDetail>,
    #[serde(default)]
    pub seguimientos: Vec<FollowUp>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NewTreatmentDetail {
    pub tratamiento: i32,
    pub pieza_dental: Option<i32>,
    pub cara_dental: Option<i32>,
}

/// Body posted on create and update of a clinical record.
#[derive(Debug, Serialize)]
pub struct NewClinicalRecord<'a> {
    pub paciente: i32,
    pub odontologo: i32,
    pub descripcion: &'a str,
    pub finalizado: bool,
    pub fecha_fin: Option<NaiveDate>,
    pub detalles: Vec<NewTreatmentDetail>,
}

#[derive(Debug, Serialize)]
pub struct NewFollowUp<'a> {
    pub historia_clinica: i32,
    pub odontologo: i32,
    pub descripcion: &'a str,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UpdateFollowUp<'a> {
    pub odontologo: i32,
    pub descripcion: &'a str,
    pub fecha: DateTime<Utc>,
}

impl TryFrom<TreatmentDetail> for DomainTreatmentDetail {
    type Error = TypeConstraintError;

    fn try_from(row: TreatmentDetail) -> Result<Self, Self::Error> {
        Ok(Self {
            treatment_id: TreatmentId::new(row.tratamiento)?,
            tooth_id: row.pieza_dental.map(ToothId::new).transpose()?,
            tooth: row.pieza_codigo.map(ToothNumber::try_from).transpose()?,
            surface_id: row.cara_dental.map(SurfaceId::new).transpose()?,
            treatment_name: row.tratamiento_nombre,
            surface_name: row.cara_nombre,
        })
    }
}

impl FollowUp {
    pub fn into_domain(self, record_id: ClinicalRecordId) -> Result<DomainFollowUp, TypeConstraintError> {
        Ok(DomainFollowUp {
            id: FollowUpId::new(self.id)?,
            record_id,
            dentist_id: self.odontologo.map(StaffId::new).transpose()?,
            dentist_name: self.odontologo_nombre,
            description: self.descripcion,
            date: self.fecha,
        })
    }
}

impl TryFrom<ClinicalRecord> for DomainClinicalRecord {
    type Error = TypeConstraintError;

    fn try_from(row: ClinicalRecord) -> Result<Self, Self::Error> {
        let id = ClinicalRecordId::new(row.id)?;
        let mut follow_ups = row
            .seguimientos
            .into_iter()
            .map(|follow_up| follow_up.into_domain(id))
            .collect::<Result<Vec<_>, _>>()?;
        // Newest note first.
        follow_ups.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(Self {
            id,
            patient_id: PatientId::new(row.paciente)?,
            patient_name: row.paciente_nombre,
            dentist_id: row.odontologo.map(StaffId::new).transpose()?,
            dentist_name: row.odontologo_nombre,
            description: row.descripcion.unwrap_or_default(),
            finalized: row.finalizado,
            start_date: row.fecha_inicio,
            end_date: row.fecha_fin,
            details: row
                .detalles
                .into_iter()
                .map(DomainTreatmentDetail::try_from)
                .collect::<Result<_, _>>()?,
            follow_ups,
        })
    }
}

impl From<&DomainTreatmentDetail> for NewTreatmentDetail {
    fn from(detail: &DomainTreatmentDetail) -> Self {
        Self {
            tratamiento: detail.treatment_id.get(),
            pieza_dental: detail.tooth_id.map(|id| id.get()),
            cara_dental: detail.surface_id.map(|id| id.get()),
        }
    }
}

impl<'a> From<&'a DomainNewClinicalRecord> for NewClinicalRecord<'a> {
    fn from(record: &'a DomainNewClinicalRecord) -> Self {
        Self {
            paciente: record.patient_id.get(),
            odontologo: record.dentist_id.get(),
            descripcion: record.description.as_str(),
            finalizado: record.finalized,
            fecha_fin: record.end_date,
            detalles: record.details.iter().map(NewTreatmentDetail::from).collect(),
        }
    }
}

impl<'a> From<&'a DomainNewFollowUp> for NewFollowUp<'a> {
    fn from(follow_up: &'a DomainNewFollowUp) -> Self {
        Self {
            historia_clinica: follow_up.record_id.get(),
            odontologo: follow_up.dentist_id.get(),
            descripcion: follow_up.description.as_str(),
            fecha: follow_up.date,
        }
    }
}

impl<'a> From<&'a DomainUpdateFollowUp> for UpdateFollowUp<'a> {
    fn from(follow_up: &'a DomainUpdateFollowUp) -> Self {
        Self {
            odontologo: follow_up.dentist_id.get(),
            descripcion: follow_up.description.as_str(),
            fecha: follow_up.date,
        }
    }
}
