//! Dashboard statistics.

use chrono::NaiveDate;

use crate::domain::capabilities::{Capability, Role};
use crate::domain::catalog::TreatmentCatalog;
use crate::domain::stats::{self, StatsPeriod};
use crate::domain::types::{AppointmentStatusId, StaffId};
use crate::dto::dashboard::{DashboardPageData, DashboardQuery, PeriodOption};
use crate::forms::parse_optional_id;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{AppointmentReader, CatalogReader, ClinicalRecordReader, StaffReader};
use crate::services::staff::active_dentists;
use crate::services::{ServiceResult, ensure_capability};

/// Loads the charts and today's agenda.
///
/// Dentists see their own agenda; everyone else sees the whole clinic.
pub async fn load_dashboard<R>(
    query: DashboardQuery,
    today: NaiveDate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<DashboardPageData>
where
    R: AppointmentReader + CatalogReader + ClinicalRecordReader + StaffReader + ?Sized,
{
    ensure_capability(user, Capability::ViewDashboard)?;

    let period = query.period.unwrap_or_default();
    let since = period.start(today);
    let selected_dentist = parse_optional_id(query.dentist_id.as_deref())?;
    let selected_status = parse_optional_id(query.status_id.as_deref())?;

    let records = repo.list_records(None).await.map_err(|err| {
        log::error!("Failed to list clinical records: {err}");
        err
    })?;
    let treatments = repo.list_treatments().await.map_err(|err| {
        log::error!("Failed to list treatments: {err}");
        err
    })?;
    let appointments = repo.list_appointments().await.map_err(|err| {
        log::error!("Failed to list appointments: {err}");
        err
    })?;
    let statuses = repo.list_statuses().await.map_err(|err| {
        log::error!("Failed to list appointment statuses: {err}");
        err
    })?;
    let dentists = active_dentists(repo).await?;

    let top_treatments =
        stats::top_treatments(&records, &TreatmentCatalog::new(treatments), since);
    let status_counts = stats::appointments_by_status(
        &appointments,
        &statuses,
        since,
        selected_dentist.map(StaffId::new).transpose()?,
        selected_status.map(AppointmentStatusId::new).transpose()?,
    );
    let own_agenda = (user.role == Role::Dentist).then_some(user.id);
    let todays_appointments = stats::todays_appointments(&appointments, today, own_agenda);

    let periods = StatsPeriod::ALL
        .into_iter()
        .map(|value| PeriodOption {
            value,
            label: value.label(),
            selected: value == period,
        })
        .collect();

    Ok(DashboardPageData {
        periods,
        top_treatments,
        status_counts,
        todays_appointments,
        dentists,
        statuses,
        selected_dentist,
        selected_status,
    })
}
