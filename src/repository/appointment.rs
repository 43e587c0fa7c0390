use chrono::NaiveTime;
use reqwest::Method;

use crate::domain::appointment::{Appointment, AppointmentStatus, NewAppointment, ScheduleSlot};
use crate::domain::types::{AppointmentId, ScheduleSlotId};
use crate::models::appointment::{
    Appointment as WireAppointment, NewAppointment as WireNewAppointment,
};
use crate::models::catalog::{CatalogRow, ScheduleSlotPayload, ScheduleSlotRow};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{AppointmentReader, AppointmentWriter, RestRepository};

impl AppointmentReader for RestRepository {
    async fn list_appointments(&self) -> RepositoryResult<Vec<Appointment>> {
        let rows: Vec<WireAppointment> = self.get_list("turnos/", &[]).await?;
        convert_all(rows)
    }

    async fn get_appointment(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>> {
        let row: Option<WireAppointment> = self.get_optional(&format!("turnos/{id}/")).await?;
        Ok(row.map(Appointment::try_from).transpose()?)
    }

    async fn list_slots(&self) -> RepositoryResult<Vec<ScheduleSlot>> {
        let rows: Vec<ScheduleSlotRow> = self.get_list("turnos/horarios/", &[]).await?;
        let mut slots: Vec<ScheduleSlot> = convert_all(rows)?;
        slots.sort_by_key(|slot| slot.time);
        Ok(slots)
    }

    async fn list_statuses(&self) -> RepositoryResult<Vec<AppointmentStatus>> {
        let rows: Vec<CatalogRow> = self.get_list("turnos/estados/", &[]).await?;
        convert_all(rows)
    }
}

impl AppointmentWriter for RestRepository {
    async fn create_appointment(&self, appointment: &NewAppointment) -> RepositoryResult<Appointment> {
        let row: WireAppointment = self
            .send(Method::POST, "turnos/", &WireNewAppointment::from(appointment))
            .await?;
        Ok(Appointment::try_from(row)?)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let row: WireAppointment = self
            .send(
                Method::PATCH,
                &format!("turnos/{id}/"),
                &WireNewAppointment::from(appointment),
            )
            .await?;
        Ok(Appointment::try_from(row)?)
    }

    async fn delete_appointment(&self, id: AppointmentId) -> RepositoryResult<()> {
        self.delete(&format!("turnos/{id}/")).await
    }

    async fn create_slot(&self, time: NaiveTime) -> RepositoryResult<ScheduleSlot> {
        let row: ScheduleSlotRow = self
            .send(Method::POST, "turnos/horarios/", &ScheduleSlotPayload::from(time))
            .await?;
        Ok(ScheduleSlot::try_from(row)?)
    }

    async fn update_slot(&self, id: ScheduleSlotId, time: NaiveTime) -> RepositoryResult<ScheduleSlot> {
        let row: ScheduleSlotRow = self
            .send(
                Method::PUT,
                &format!("turnos/horarios/{id}/"),
                &ScheduleSlotPayload::from(time),
            )
            .await?;
        Ok(ScheduleSlot::try_from(row)?)
    }

    async fn delete_slot(&self, id: ScheduleSlotId) -> RepositoryResult<()> {
        self.delete(&format!("turnos/horarios/{id}/")).await
    }
}
