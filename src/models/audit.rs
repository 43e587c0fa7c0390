use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::audit::{
    AppointmentAuditAction, AppointmentAuditEntry as DomainAppointmentAuditEntry,
    PaymentAuditAction, PaymentAuditEntry as DomainPaymentAuditEntry,
};
use crate::domain::types::{AppointmentId, AuditEntryId, ClinicalRecordId, TypeConstraintError};
use crate::models::fields;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAuditEntry {
    pub id: i32,
    pub accion: PaymentAuditAction,
    #[serde(deserialize_with = "fields::timestamp")]
    pub fecha_accion: DateTime<Utc>,
    #[serde(default)]
    pub tipo_pago_nombre: Option<String>,
    #[serde(default)]
    pub paciente_nombre: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub paciente_dni: Option<String>,
    #[serde(default)]
    pub hist_clin_numero: Option<i32>,
    #[serde(default)]
    pub usuario_nombre: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentAuditEntry {
    pub id: i32,
    pub accion: AppointmentAuditAction,
    #[serde(deserialize_with = "fields::timestamp")]
    pub fecha_accion: DateTime<Utc>,
    #[serde(default)]
    pub turno_numero: Option<i32>,
    #[serde(default)]
    pub paciente_nombre: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub paciente_dni: Option<String>,
    #[serde(default)]
    pub odontologo_nombre: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_date")]
    pub fecha_turno: Option<NaiveDate>,
    #[serde(default)]
    pub horario_display: Option<String>,
    #[serde(default)]
    pub estado_anterior: Option<String>,
    #[serde(default)]
    pub estado_nuevo: Option<String>,
    #[serde(default)]
    pub usuario_nombre: Option<String>,
}

impl TryFrom<PaymentAuditEntry> for DomainPaymentAuditEntry {
    type Error = TypeConstraintError;

    fn try_from(row: PaymentAuditEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuditEntryId::new(row.id)?,
            action: row.accion,
            timestamp: row.fecha_accion,
            payment_type_name: row.tipo_pago_nombre,
            patient_name: row.paciente_nombre,
            patient_dni: row.paciente_dni,
            record_id: row.hist_clin_numero.map(ClinicalRecordId::new).transpose()?,
            user_name: row.usuario_nombre,
        })
    }
}

impl TryFrom<AppointmentAuditEntry> for DomainAppointmentAuditEntry {
    type Error = TypeConstraintError;

    fn try_from(row: AppointmentAuditEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuditEntryId::new(row.id)?,
            action: row.accion,
            timestamp: row.fecha_accion,
            appointment_id: row.turno_numero.map(AppointmentId::new).transpose()?,
            patient_name: row.paciente_nombre,
            patient_dni: row.paciente_dni,
            dentist_name: row.odontologo_nombre,
            appointment_date: row.fecha_turno,
            slot_label: row.horario_display,
            previous_status: row.estado_anterior,
            new_status: row.estado_nuevo,
            user_name: row.usuario_nombre,
        })
    }
}
