use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::domain::appointment::{AppointmentFilter, NewAppointment};
use crate::domain::types::{
    AppointmentId, AppointmentStatusId, PatientId, ScheduleSlotId, StaffId,
};
use crate::forms::{
    FormError, non_blank, parse_date, parse_optional_date, parse_optional_id, parse_time,
};

/// Appointment list filters; empty values mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
    pub dentist_id: Option<String>,
    pub status_id: Option<String>,
    pub page: Option<usize>,
}

impl TryFrom<&AppointmentsQuery> for AppointmentFilter {
    type Error = FormError;

    fn try_from(query: &AppointmentsQuery) -> Result<Self, Self::Error> {
        Ok(AppointmentFilter {
            date: parse_optional_date(query.date.as_deref())?,
            dentist_id: parse_optional_id(query.dentist_id.as_deref())?
                .map(StaffId::new)
                .transpose()?,
            status_id: parse_optional_id(query.status_id.as_deref())?
                .map(AppointmentStatusId::new)
                .transpose()?,
        })
    }
}

/// Free slot lookup behind the appointment form.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub dentist_id: i32,
    pub date: String,
    pub editing: Option<String>,
}

impl SlotsQuery {
    pub fn parse(&self) -> Result<(StaffId, NaiveDate, Option<AppointmentId>), FormError> {
        Ok((
            StaffId::new(self.dentist_id)?,
            parse_date(&self.date)?,
            parse_optional_id(self.editing.as_deref())?
                .map(AppointmentId::new)
                .transpose()?,
        ))
    }
}

/// Create and edit form of an appointment. Every field but the reason is
/// required; dentists have their own id forced by the service.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentForm {
    pub patient_id: Option<String>,
    pub dentist_id: Option<String>,
    pub date: Option<String>,
    pub slot_id: Option<String>,
    pub status_id: Option<String>,
    #[serde(default)]
    pub reason: String,
}

fn required(value: Option<&str>) -> Result<i32, FormError> {
    parse_optional_id(value)?.ok_or(FormError::MissingField)
}

impl AppointmentForm {
    /// Builds the booking, using `pinned_dentist` instead of the posted one
    /// when given.
    pub fn into_new_appointment(
        self,
        pinned_dentist: Option<StaffId>,
    ) -> Result<NewAppointment, FormError> {
        let dentist_id = match pinned_dentist {
            Some(id) => id,
            None => StaffId::new(required(self.dentist_id.as_deref())?)?,
        };
        let date = self
            .date
            .as_deref()
            .and_then(non_blank)
            .ok_or(FormError::MissingField)?;

        Ok(NewAppointment {
            patient_id: PatientId::new(required(self.patient_id.as_deref())?)?,
            dentist_id,
            date: parse_date(&date)?,
            slot_id: ScheduleSlotId::new(required(self.slot_id.as_deref())?)?,
            status_id: AppointmentStatusId::new(required(self.status_id.as_deref())?)?,
            reason: non_blank(&self.reason),
        })
    }
}

/// Fixed schedule slot form (`<input type="time">`).
#[derive(Debug, Deserialize)]
pub struct SlotForm {
    pub time: String,
}

impl TryFrom<SlotForm> for NaiveTime {
    type Error = FormError;

    fn try_from(form: SlotForm) -> Result<Self, Self::Error> {
        parse_time(&form.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AppointmentForm {
        AppointmentForm {
            patient_id: Some("5".to_string()),
            dentist_id: Some("3".to_string()),
            date: Some("2024-05-13".to_string()),
            slot_id: Some("2".to_string()),
            status_id: Some("1".to_string()),
            reason: " ".to_string(),
        }
    }

    #[test]
    fn pinned_dentist_overrides_posted_one() {
        let booking = form()
            .into_new_appointment(Some(StaffId::new(9).unwrap()))
            .unwrap();
        assert_eq!(booking.dentist_id.get(), 9);
        assert_eq!(booking.reason, None);
    }

    #[test]
    fn missing_required_field() {
        let mut form = form();
        form.slot_id = Some(String::new());
        assert!(matches!(
            form.into_new_appointment(None),
            Err(FormError::MissingField)
        ));
    }

    #[test]
    fn empty_filters_match_everything() {
        let query = AppointmentsQuery {
            date: Some(String::new()),
            dentist_id: None,
            status_id: Some("2".to_string()),
            page: None,
        };
        let filter = AppointmentFilter::try_from(&query).unwrap();
        assert_eq!(filter.date, None);
        assert_eq!(filter.status_id.map(AppointmentStatusId::get), Some(2));
    }
}
