use serde::{Deserialize, Serialize};

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::staff::StaffMember;
use crate::domain::stats::{StatsPeriod, StatusCount, TopTreatments};

/// Query parameters of the dashboard charts.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub period: Option<StatsPeriod>,
    pub dentist_id: Option<String>,
    pub status_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodOption {
    pub value: StatsPeriod,
    pub label: &'static str,
    pub selected: bool,
}

/// Data required to render the dashboard template.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub periods: Vec<PeriodOption>,
    pub top_treatments: TopTreatments,
    pub status_counts: Vec<StatusCount>,
    pub todays_appointments: Vec<Appointment>,
    /// Filter choices of the appointment chart.
    pub dentists: Vec<StaffMember>,
    pub statuses: Vec<AppointmentStatus>,
    pub selected_dentist: Option<i32>,
    pub selected_status: Option<i32>,
}
