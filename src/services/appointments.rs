//! Appointment book and the fixed daily schedule.

use std::cmp::Reverse;

use chrono::{NaiveDateTime, NaiveTime};

use crate::domain::appointment::{
    Appointment, AppointmentFilter, NewAppointment, ScheduleSlot, available_slots,
    ensure_slot_available,
};
use crate::domain::capabilities::Capability;
use crate::domain::types::{AppointmentId, ScheduleSlotId, StaffId, fold_name};
use crate::dto::appointments::{AppointmentFormData, AppointmentsPageData, SlotOption};
use crate::forms::appointments::{AppointmentForm, AppointmentsQuery, SlotForm, SlotsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{AppointmentReader, AppointmentWriter, PatientReader, StaffReader};
use crate::services::staff::active_dentists;
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Dentist the user is restricted to, if any.
fn pinned_dentist(user: &AuthenticatedUser) -> Option<StaffId> {
    (!user.can(Capability::ScheduleAnyDentist)).then_some(user.id)
}

async fn get_appointment<R>(id: AppointmentId, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentReader + ?Sized,
{
    repo.get_appointment(id)
        .await
        .map_err(|err| {
            log::error!("Failed to get appointment {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Loads an appointment the user may change.
async fn owned_appointment<R>(
    id: AppointmentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentReader + ?Sized,
{
    let appointment = get_appointment(id, repo).await?;
    match pinned_dentist(user) {
        Some(own) if appointment.dentist_id != own => Err(ServiceError::Unauthorized),
        _ => Ok(appointment),
    }
}

async fn slots_and_appointments<R>(
    repo: &R,
) -> ServiceResult<(Vec<ScheduleSlot>, Vec<Appointment>)>
where
    R: AppointmentReader + ?Sized,
{
    let slots = repo.list_slots().await.map_err(|err| {
        log::error!("Failed to list schedule slots: {err}");
        err
    })?;
    let appointments = repo.list_appointments().await.map_err(|err| {
        log::error!("Failed to list appointments: {err}");
        err
    })?;
    Ok((slots, appointments))
}

/// Lists appointments, newest first. Dentists only see their own.
pub async fn list_appointments<R>(
    query: AppointmentsQuery,
    per_page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AppointmentsPageData>
where
    R: AppointmentReader + StaffReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let mut filter = AppointmentFilter::try_from(&query)?;
    if let Some(own) = pinned_dentist(user) {
        filter.dentist_id = Some(own);
    }

    let (slots, appointments) = slots_and_appointments(repo).await?;
    let time_of = |id: ScheduleSlotId| slots.iter().find(|s| s.id == id).map(|s| s.time);

    let mut appointments: Vec<Appointment> = appointments
        .into_iter()
        .filter(|a| filter.matches(a))
        .collect();
    appointments.sort_by_key(|a| (Reverse(a.date), time_of(a.slot_id), a.id));

    let statuses = repo.list_statuses().await.map_err(|err| {
        log::error!("Failed to list appointment statuses: {err}");
        err
    })?;
    let dentists = active_dentists(repo).await?;

    Ok(AppointmentsPageData {
        appointments: Paginated::from_all(appointments, query.page.unwrap_or(1), per_page),
        dentists,
        statuses,
        selected_date: filter.date.map(|d| d.format("%Y-%m-%d").to_string()),
        selected_dentist: filter.dentist_id.map(StaffId::get),
        selected_status: filter.status_id.map(|id| id.get()),
    })
}

pub async fn load_appointment_form<R>(
    id: Option<AppointmentId>,
    now: NaiveDateTime,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<AppointmentFormData>
where
    R: AppointmentReader + PatientReader + StaffReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let appointment = match id {
        Some(id) => Some(owned_appointment(id, user, repo).await?),
        None => None,
    };

    let slots = match &appointment {
        Some(appointment) => {
            let (slots, appointments) = slots_and_appointments(repo).await?;
            let mut free = available_slots(
                &slots,
                &appointments,
                appointment.dentist_id,
                appointment.date,
                Some(appointment.id),
                now,
            )
            .unwrap_or_default();
            // An appointment already in the past keeps showing its own slot.
            if !free.iter().any(|s| s.id == appointment.slot_id)
                && let Some(own) = slots.iter().find(|s| s.id == appointment.slot_id)
            {
                free.push(own.clone());
                free.sort_by_key(|s| s.time);
            }
            free
        }
        None => Vec::new(),
    };

    let mut patients: Vec<_> = repo
        .list_patients()
        .await
        .map_err(|err| {
            log::error!("Failed to list patients: {err}");
            err
        })?
        .into_iter()
        .filter(|p| p.active)
        .collect();
    patients.sort_by_cached_key(|p| (fold_name(&p.last_name), fold_name(&p.first_name)));

    let statuses = repo.list_statuses().await.map_err(|err| {
        log::error!("Failed to list appointment statuses: {err}");
        err
    })?;
    let pinned_dentist = pinned_dentist(user);
    let dentists = active_dentists(repo)
        .await?
        .into_iter()
        .filter(|d| pinned_dentist.is_none_or(|own| d.id == own))
        .collect();

    Ok(AppointmentFormData {
        appointment,
        patients,
        dentists,
        statuses,
        slots,
        pinned_dentist,
    })
}

/// Free slots of a dentist on a date, for the appointment form.
pub async fn free_slots<R>(
    query: SlotsQuery,
    now: NaiveDateTime,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<SlotOption>>
where
    R: AppointmentReader + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let (dentist, date, editing) = query.parse()?;
    let dentist = pinned_dentist(user).unwrap_or(dentist);

    let (slots, appointments) = slots_and_appointments(repo).await?;
    let free = available_slots(&slots, &appointments, dentist, date, editing, now)?;
    Ok(free.iter().map(SlotOption::from).collect())
}

/// Creates or updates an appointment after checking the slot is free.
///
/// Editing an appointment without moving it (same dentist, date and slot)
/// skips the availability check, so past appointments can still change
/// status.
pub async fn save_appointment<R>(
    id: Option<AppointmentId>,
    form: AppointmentForm,
    now: NaiveDateTime,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentReader + AppointmentWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    let booking = form.into_new_appointment(pinned_dentist(user)).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let current = match id {
        Some(id) => Some(owned_appointment(id, user, repo).await?),
        None => None,
    };
    let unmoved = current.as_ref().is_some_and(|a| {
        a.dentist_id == booking.dentist_id && a.date == booking.date && a.slot_id == booking.slot_id
    });

    if !unmoved {
        if booking.date < now.date() {
            return Err(ServiceError::Warning(
                "No se pueden agendar turnos en fechas pasadas.".to_string(),
            ));
        }
        let (slots, appointments) = slots_and_appointments(repo).await?;
        ensure_slot_available(&slots, &appointments, &booking, id, now)?;
    }

    let saved = match id {
        Some(id) => repo.update_appointment(id, &booking).await.map_err(|err| {
            log::error!("Failed to update appointment {id}: {err}");
            err
        })?,
        None => repo.create_appointment(&booking).await.map_err(|err| {
            log::error!("Failed to create appointment: {err}");
            err
        })?,
    };
    Ok(saved)
}

pub async fn delete_appointment<R>(
    id: AppointmentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: AppointmentReader + AppointmentWriter + ?Sized,
{
    ensure_capability(user, Capability::ManagePatients)?;

    owned_appointment(id, user, repo).await?;
    repo.delete_appointment(id).await.map_err(|err| {
        log::error!("Failed to delete appointment {id}: {err}");
        err
    })?;
    Ok(())
}

pub async fn list_schedule<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ScheduleSlot>>
where
    R: AppointmentReader + ?Sized,
{
    ensure_capability(user, Capability::ManageSchedule)?;

    let slots = repo.list_slots().await.map_err(|err| {
        log::error!("Failed to list schedule slots: {err}");
        err
    })?;
    Ok(slots)
}

fn slot_time(form: SlotForm, slots: &[ScheduleSlot], editing: Option<ScheduleSlotId>) -> ServiceResult<NaiveTime> {
    let time = NaiveTime::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;
    if slots.iter().any(|s| s.time == time && Some(s.id) != editing) {
        return Err(ServiceError::Form(
            "Ya existe un horario a esa hora.".to_string(),
        ));
    }
    Ok(time)
}

pub async fn create_slot<R>(
    form: SlotForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ScheduleSlot>
where
    R: AppointmentReader + AppointmentWriter + ?Sized,
{
    let slots = list_schedule(user, repo).await?;
    let time = slot_time(form, &slots, None)?;

    let slot = repo.create_slot(time).await.map_err(|err| {
        log::error!("Failed to create schedule slot: {err}");
        err
    })?;
    Ok(slot)
}

pub async fn update_slot<R>(
    id: ScheduleSlotId,
    form: SlotForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ScheduleSlot>
where
    R: AppointmentReader + AppointmentWriter + ?Sized,
{
    let slots = list_schedule(user, repo).await?;
    let time = slot_time(form, &slots, Some(id))?;

    let slot = repo.update_slot(id, time).await.map_err(|err| {
        log::error!("Failed to update schedule slot {id}: {err}");
        err
    })?;
    Ok(slot)
}

pub async fn delete_slot<R>(id: ScheduleSlotId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: AppointmentWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageSchedule)?;

    repo.delete_slot(id).await.map_err(|err| {
        log::error!("Failed to delete schedule slot {id}: {err}");
        err
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::appointment::fixtures::{appointment, slot};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{admin, dentist, secretary};

    /// Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 13).expect("valid date")
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).expect("valid time")
    }

    fn repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_slots()
            .returning(|| Ok(vec![slot(1, 9), slot(2, 10), slot(3, 11)]));
        repo.expect_list_appointments().returning(|| {
            Ok(vec![
                appointment(1, 3, monday(), 2, 1),
                appointment(2, 5, monday(), 1, 1),
            ])
        });
        repo
    }

    fn form(dentist: i32, slot: i32) -> AppointmentForm {
        AppointmentForm {
            patient_id: Some("1".to_string()),
            dentist_id: Some(dentist.to_string()),
            date: Some("2024-05-13".to_string()),
            slot_id: Some(slot.to_string()),
            status_id: Some("1".to_string()),
            reason: String::new(),
        }
    }

    #[actix_web::test]
    async fn dentist_slots_ignore_requested_dentist() {
        let repo = repo();
        let query = SlotsQuery {
            dentist_id: 5,
            date: "2024-05-13".to_string(),
            editing: None,
        };

        let slots = free_slots(query, at(monday(), 8), &dentist(), &repo)
            .await
            .expect("should list slots");

        let ids: Vec<i32> = slots.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(slots[0].label, "09:00");
    }

    #[actix_web::test]
    async fn weekend_slots_are_a_warning() {
        let repo = repo();
        let query = SlotsQuery {
            dentist_id: 3,
            date: "2024-05-18".to_string(),
            editing: None,
        };

        let result = free_slots(query, at(monday(), 8), &secretary(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Warning(_))));
    }

    #[actix_web::test]
    async fn taken_slot_is_rejected() {
        let mut repo = repo();
        repo.expect_create_appointment().times(0);

        let result = save_appointment(None, form(3, 2), at(monday(), 8), &secretary(), &repo).await;

        assert!(
            matches!(result, Err(ServiceError::Warning(msg)) if msg == "El horario seleccionado ya está ocupado.")
        );
    }

    #[actix_web::test]
    async fn dentist_books_for_themselves() {
        let mut repo = repo();
        let user = dentist();
        let own = user.id;
        repo.expect_create_appointment()
            .withf(move |booking| booking.dentist_id == own && booking.slot_id.get() == 1)
            .times(1)
            .returning(|_| Ok(appointment(9, 3, monday(), 1, 1)));

        let saved = save_appointment(None, form(5, 1), at(monday(), 8), &user, &repo)
            .await
            .expect("should book");

        assert_eq!(saved.id.get(), 9);
    }

    #[actix_web::test]
    async fn status_change_of_past_appointment_is_allowed() {
        let mut repo = MockRepository::new();
        repo.expect_get_appointment()
            .returning(|_| Ok(Some(appointment(1, 3, monday(), 2, 1))));
        repo.expect_list_slots().times(0);
        repo.expect_update_appointment()
            .withf(|id, booking| id.get() == 1 && booking.status_id.get() == 2)
            .times(1)
            .returning(|_, _| Ok(appointment(1, 3, monday(), 2, 2)));
        let mut form = form(3, 2);
        form.status_id = Some("2".to_string());

        save_appointment(
            Some(AppointmentId::new(1).expect("valid id")),
            form,
            at(monday(), 18),
            &admin(),
            &repo,
        )
        .await
        .expect("should update status");
    }

    #[actix_web::test]
    async fn dentist_cannot_delete_others_appointments() {
        let mut repo = MockRepository::new();
        repo.expect_get_appointment()
            .returning(|_| Ok(Some(appointment(2, 5, monday(), 1, 1))));
        repo.expect_delete_appointment().times(0);

        let result = delete_appointment(AppointmentId::new(2).expect("valid id"), &dentist(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn duplicate_slot_time_is_rejected() {
        let mut repo = repo();
        repo.expect_create_slot().times(0);

        let result = create_slot(
            SlotForm {
                time: "10:00".to_string(),
            },
            &admin(),
            &repo,
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn list_sorts_by_date_then_time() {
        let mut repo = MockRepository::new();
        repo.expect_list_slots()
            .returning(|| Ok(vec![slot(1, 11), slot(2, 9)]));
        repo.expect_list_appointments().returning(|| {
            let tuesday = monday().succ_opt().expect("valid date");
            Ok(vec![
                appointment(1, 3, monday(), 2, 1),
                appointment(2, 3, tuesday, 1, 1),
                appointment(3, 3, tuesday, 2, 1),
            ])
        });
        repo.expect_list_statuses().returning(|| Ok(vec![]));
        repo.expect_list_staff().returning(|| Ok(vec![]));

        let data = list_appointments(AppointmentsQuery::default(), 20, &secretary(), &repo)
            .await
            .expect("should list appointments");

        let ids: Vec<i32> = data.appointments.items.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
