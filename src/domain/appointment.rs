//! Appointments (turnos) and the fixed daily schedule they are booked into.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{
    AppointmentId, AppointmentStatusId, CatalogName, PatientId, ScheduleSlotId, StaffId,
};

/// Bookable time of day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub id: ScheduleSlotId,
    pub time: NaiveTime,
}

impl ScheduleSlot {
    pub fn label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentStatus {
    pub id: AppointmentStatusId,
    pub name: CatalogName,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub patient_name: Option<String>,
    pub dentist_id: StaffId,
    pub dentist_name: Option<String>,
    pub date: NaiveDate,
    pub slot_id: ScheduleSlotId,
    pub slot_label: Option<String>,
    pub status_id: AppointmentStatusId,
    pub status_name: Option<String>,
    pub reason: Option<String>,
}

/// Appointment data posted on create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: PatientId,
    pub dentist_id: StaffId,
    pub date: NaiveDate,
    pub slot_id: ScheduleSlotId,
    pub status_id: AppointmentStatusId,
    pub reason: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("No se pueden agendar turnos en Sábados ni Domingos.")]
    Weekend,
    #[error("El horario seleccionado no existe.")]
    UnknownSlot,
    #[error("El horario seleccionado ya está ocupado.")]
    Taken,
    #[error("El horario seleccionado ya pasó.")]
    Past,
}

/// Rejects Saturdays and Sundays.
pub fn ensure_working_day(date: NaiveDate) -> Result<(), SlotError> {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => Err(SlotError::Weekend),
        _ => Ok(()),
    }
}

/// Free slots of `dentist` on `date`.
///
/// Slots taken by another appointment of the same dentist that day are
/// removed; `editing` keeps its own slot available. On the current day only
/// slots later than `now` are offered.
pub fn available_slots(
    slots: &[ScheduleSlot],
    appointments: &[Appointment],
    dentist: StaffId,
    date: NaiveDate,
    editing: Option<AppointmentId>,
    now: NaiveDateTime,
) -> Result<Vec<ScheduleSlot>, SlotError> {
    ensure_working_day(date)?;

    let taken: Vec<ScheduleSlotId> = appointments
        .iter()
        .filter(|a| a.dentist_id == dentist && a.date == date && Some(a.id) != editing)
        .map(|a| a.slot_id)
        .collect();

    let mut free: Vec<ScheduleSlot> = slots
        .iter()
        .filter(|slot| !taken.contains(&slot.id))
        .filter(|slot| date != now.date() || slot.time > now.time())
        .cloned()
        .collect();
    free.sort_by_key(|slot| slot.time);
    Ok(free)
}

/// Checks a single booking against [`available_slots`].
pub fn ensure_slot_available(
    slots: &[ScheduleSlot],
    appointments: &[Appointment],
    booking: &NewAppointment,
    editing: Option<AppointmentId>,
    now: NaiveDateTime,
) -> Result<(), SlotError> {
    let slot = slots
        .iter()
        .find(|s| s.id == booking.slot_id)
        .ok_or(SlotError::UnknownSlot)?;

    let free = available_slots(
        slots,
        appointments,
        booking.dentist_id,
        booking.date,
        editing,
        now,
    )?;
    if free.iter().any(|s| s.id == slot.id) {
        return Ok(());
    }
    if booking.date == now.date() && slot.time <= now.time() {
        Err(SlotError::Past)
    } else {
        Err(SlotError::Taken)
    }
}

/// Filters of the appointment list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub dentist_id: Option<StaffId>,
    pub status_id: Option<AppointmentStatusId>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.date.is_none_or(|d| appointment.date == d)
            && self.dentist_id.is_none_or(|id| appointment.dentist_id == id)
            && self.status_id.is_none_or(|id| appointment.status_id == id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn slot(id: i32, hour: u32) -> ScheduleSlot {
        ScheduleSlot {
            id: ScheduleSlotId::new(id).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        }
    }

    pub fn appointment(id: i32, dentist: i32, date: NaiveDate, slot: i32, status: i32) -> Appointment {
        Appointment {
            id: AppointmentId::new(id).unwrap(),
            patient_id: PatientId::new(1).unwrap(),
            patient_name: None,
            dentist_id: StaffId::new(dentist).unwrap(),
            dentist_name: None,
            date,
            slot_id: ScheduleSlotId::new(slot).unwrap(),
            slot_label: None,
            status_id: AppointmentStatusId::new(status).unwrap(),
            status_name: None,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    // 2024-03-04 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn slots() -> Vec<ScheduleSlot> {
        vec![slot(3, 11), slot(1, 9), slot(2, 10)]
    }

    fn ids(slots: &[ScheduleSlot]) -> Vec<i32> {
        slots.iter().map(|s| s.id.get()).collect()
    }

    fn earlier_day() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn weekends_are_rejected() {
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let dentist = StaffId::new(1).unwrap();

        assert_eq!(
            available_slots(&slots(), &[], dentist, saturday, None, earlier_day()),
            Err(SlotError::Weekend)
        );
        assert_eq!(ensure_working_day(sunday), Err(SlotError::Weekend));
        assert_eq!(ensure_working_day(monday()), Ok(()));
    }

    #[test]
    fn taken_slots_are_removed_for_same_dentist_only() {
        let dentist = StaffId::new(1).unwrap();
        let booked = vec![
            appointment(10, 1, monday(), 2, 1),
            appointment(11, 2, monday(), 3, 1),
        ];

        let free = available_slots(&slots(), &booked, dentist, monday(), None, earlier_day()).unwrap();

        assert_eq!(ids(&free), vec![1, 3]);
    }

    #[test]
    fn edited_appointment_keeps_its_slot() {
        let dentist = StaffId::new(1).unwrap();
        let booked = vec![appointment(10, 1, monday(), 2, 1)];

        let free = available_slots(
            &slots(),
            &booked,
            dentist,
            monday(),
            Some(AppointmentId::new(10).unwrap()),
            earlier_day(),
        )
        .unwrap();

        assert_eq!(ids(&free), vec![1, 2, 3]);
    }

    #[test]
    fn past_slots_are_hidden_today() {
        let dentist = StaffId::new(1).unwrap();
        let now = monday().and_hms_opt(10, 0, 0).unwrap();

        let free = available_slots(&slots(), &[], dentist, monday(), None, now).unwrap();

        assert_eq!(ids(&free), vec![3]);
    }

    #[test]
    fn booking_check_explains_rejection() {
        let booked = vec![appointment(10, 1, monday(), 2, 1)];
        let booking = NewAppointment {
            patient_id: PatientId::new(5).unwrap(),
            dentist_id: StaffId::new(1).unwrap(),
            date: monday(),
            slot_id: ScheduleSlotId::new(2).unwrap(),
            status_id: AppointmentStatusId::new(1).unwrap(),
            reason: None,
        };
        let now = monday().and_hms_opt(9, 30, 0).unwrap();

        assert_eq!(
            ensure_slot_available(&slots(), &booked, &booking, None, now),
            Err(SlotError::Taken)
        );

        let early = NewAppointment {
            slot_id: ScheduleSlotId::new(1).unwrap(),
            ..booking.clone()
        };
        assert_eq!(
            ensure_slot_available(&slots(), &booked, &early, None, now),
            Err(SlotError::Past)
        );

        let unknown = NewAppointment {
            slot_id: ScheduleSlotId::new(99).unwrap(),
            ..booking
        };
        assert_eq!(
            ensure_slot_available(&slots(), &booked, &unknown, None, now),
            Err(SlotError::UnknownSlot)
        );
    }

    #[test]
    fn filter_combines_criteria() {
        let a = appointment(1, 1, monday(), 1, 2);
        let filter = AppointmentFilter {
            date: Some(monday()),
            dentist_id: Some(StaffId::new(1).unwrap()),
            status_id: None,
        };
        assert!(filter.matches(&a));
        assert!(AppointmentFilter::default().matches(&a));

        let other_status = AppointmentFilter {
            status_id: Some(AppointmentStatusId::new(3).unwrap()),
            ..filter
        };
        assert!(!other_status.matches(&a));
    }
}
