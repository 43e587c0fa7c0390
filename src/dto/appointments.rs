use serde::Serialize;

use crate::domain::appointment::{Appointment, AppointmentStatus, ScheduleSlot};
use crate::domain::patient::Patient;
use crate::domain::staff::StaffMember;
use crate::domain::types::{ScheduleSlotId, StaffId};
use crate::pagination::Paginated;

/// Data required to render the appointment list.
#[derive(Debug, Serialize)]
pub struct AppointmentsPageData {
    pub appointments: Paginated<Appointment>,
    pub dentists: Vec<StaffMember>,
    pub statuses: Vec<AppointmentStatus>,
    pub selected_date: Option<String>,
    pub selected_dentist: Option<i32>,
    pub selected_status: Option<i32>,
}

/// Select options of the appointment form, plus the appointment when editing.
#[derive(Debug, Serialize)]
pub struct AppointmentFormData {
    pub appointment: Option<Appointment>,
    pub patients: Vec<Patient>,
    pub dentists: Vec<StaffMember>,
    pub statuses: Vec<AppointmentStatus>,
    /// Free slots for the appointment being edited; new bookings load them
    /// once dentist and date are chosen.
    pub slots: Vec<ScheduleSlot>,
    /// Set when the user may only book for themselves.
    pub pinned_dentist: Option<StaffId>,
}

/// Free slot as served to the appointment form.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SlotOption {
    pub id: ScheduleSlotId,
    pub label: String,
}

impl From<&ScheduleSlot> for SlotOption {
    fn from(slot: &ScheduleSlot) -> Self {
        Self {
            id: slot.id,
            label: slot.label(),
        }
    }
}
