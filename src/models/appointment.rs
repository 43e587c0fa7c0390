use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::appointment::{
    Appointment as DomainAppointment, NewAppointment as DomainNewAppointment,
};
use crate::domain::types::{
    AppointmentId, AppointmentStatusId, PatientId, ScheduleSlotId, StaffId, TypeConstraintError,
};
use crate::models::fields;

/// Wire model of [`crate::domain::appointment::Appointment`].
#[derive(Debug, Clone, Deserialize)]
pub struct Appointment {
    pub id: i32,
    pub paciente: i32,
    #[serde(default)]
    pub paciente_nombre: Option<String>,
    pub odontologo: i32,
    #[serde(default)]
    pub odontologo_nombre: Option<String>,
    #[serde(deserialize_with = "fields::date")]
    pub fecha_turno: NaiveDate,
    pub horario_turno: i32,
    #[serde(default)]
    pub horario_display: Option<String>,
    pub estado_turno: i32,
    #[serde(default)]
    pub estado_nombre: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub motivo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewAppointment<'a> {
    pub paciente: i32,
    pub odontologo: i32,
    pub fecha_turno: NaiveDate,
    pub horario_turno: i32,
    pub estado_turno: i32,
    pub motivo: &'a str,
}

impl TryFrom<Appointment> for DomainAppointment {
    type Error = TypeConstraintError;

    fn try_from(row: Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AppointmentId::new(row.id)?,
            patient_id: PatientId::new(row.paciente)?,
            patient_name: row.paciente_nombre,
            dentist_id: StaffId::new(row.odontologo)?,
            dentist_name: row.odontologo_nombre,
            date: row.fecha_turno,
            slot_id: ScheduleSlotId::new(row.horario_turno)?,
            // "09:00:00" is shown as "09:00".
            slot_label: row
                .horario_display
                .map(|label| label.get(..5).map(str::to_string).unwrap_or(label)),
            status_id: AppointmentStatusId::new(row.estado_turno)?,
            status_name: row.estado_nombre,
            reason: row.motivo,
        })
    }
}

impl<'a> From<&'a DomainNewAppointment> for NewAppointment<'a> {
    fn from(appointment: &'a DomainNewAppointment) -> Self {
        Self {
            paciente: appointment.patient_id.get(),
            odontologo: appointment.dentist_id.get(),
            fecha_turno: appointment.date,
            horario_turno: appointment.slot_id.get(),
            estado_turno: appointment.status_id.get(),
            motivo: appointment.reason.as_deref().unwrap_or_default(),
        }
    }
}
