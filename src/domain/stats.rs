//! Dashboard statistics computed from already fetched lists.

use std::collections::HashMap;

use chrono::{Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::catalog::TreatmentCatalog;
use crate::domain::clinical_record::ClinicalRecord;
use crate::domain::types::{AppointmentStatusId, StaffId};

/// Reporting window counted back from today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    LastWeek,
    #[default]
    LastMonth,
    LastYear,
    AllTime,
}

impl StatsPeriod {
    pub const ALL: [StatsPeriod; 4] = [
        StatsPeriod::LastWeek,
        StatsPeriod::LastMonth,
        StatsPeriod::LastYear,
        StatsPeriod::AllTime,
    ];

    /// First day included, `None` for all time.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            StatsPeriod::LastWeek => today.checked_sub_signed(TimeDelta::days(7)),
            StatsPeriod::LastMonth => today.checked_sub_months(Months::new(1)),
            StatsPeriod::LastYear => today.checked_sub_months(Months::new(12)),
            StatsPeriod::AllTime => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatsPeriod::LastWeek => "Última semana",
            StatsPeriod::LastMonth => "Último mes",
            StatsPeriod::LastYear => "Último año",
            StatsPeriod::AllTime => "Todos los tiempos",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TreatmentCount {
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TopTreatments {
    pub rows: Vec<TreatmentCount>,
    pub total: usize,
}

/// Five most frequent treatments of records started since `since`.
///
/// Each record counts once, under the treatment of its first detail.
pub fn top_treatments(
    records: &[ClinicalRecord],
    catalog: &TreatmentCatalog,
    since: Option<NaiveDate>,
) -> TopTreatments {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        if since.is_some_and(|start| record.start_date < start) {
            continue;
        }
        let Some(first) = record.details.first() else {
            continue;
        };
        let name = catalog
            .get(first.treatment_id)
            .map(|t| t.name.to_string())
            .or_else(|| first.treatment_name.clone())
            .unwrap_or_else(|| format!("#{}", first.treatment_id));
        *counts.entry(name).or_default() += 1;
    }

    let mut rows: Vec<TreatmentCount> = counts
        .into_iter()
        .map(|(name, count)| TreatmentCount { name, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows.truncate(5);

    let total = rows.iter().map(|r| r.count).sum();
    TopTreatments { rows, total }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status_id: AppointmentStatusId,
    pub name: String,
    pub count: usize,
}

/// Appointments per status, zero counts included.
pub fn appointments_by_status(
    appointments: &[Appointment],
    statuses: &[AppointmentStatus],
    since: Option<NaiveDate>,
    dentist: Option<StaffId>,
    only_status: Option<AppointmentStatusId>,
) -> Vec<StatusCount> {
    statuses
        .iter()
        .filter(|s| only_status.is_none_or(|id| s.id == id))
        .map(|status| StatusCount {
            status_id: status.id,
            name: status.name.to_string(),
            count: appointments
                .iter()
                .filter(|a| a.status_id == status.id)
                .filter(|a| since.is_none_or(|start| a.date >= start))
                .filter(|a| dentist.is_none_or(|id| a.dentist_id == id))
                .count(),
        })
        .collect()
}

/// Appointments on `today`, optionally for one dentist, in slot order.
pub fn todays_appointments(
    appointments: &[Appointment],
    today: NaiveDate,
    dentist: Option<StaffId>,
) -> Vec<Appointment> {
    let mut list: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.date == today && dentist.is_none_or(|id| a.dentist_id == id))
        .cloned()
        .collect();
    list.sort_by(|a, b| a.slot_label.cmp(&b.slot_label).then(a.id.cmp(&b.id)));
    list
}
