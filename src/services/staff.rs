//! Staff administration.

use crate::domain::capabilities::{Capability, Role};
use crate::domain::staff::{NewStaffMember, StaffMember};
use crate::domain::types::{StaffId, fold_name};
use crate::dto::staff::{StaffFormData, StaffPageData, StaffQuery};
use crate::forms::staff::StaffForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{StaffReader, StaffWriter};
use crate::services::{ServiceError, ServiceResult, ensure_capability};

/// Active dentists, the choices of every "dentist" select.
pub(crate) async fn active_dentists<R>(repo: &R) -> ServiceResult<Vec<StaffMember>>
where
    R: StaffReader + ?Sized,
{
    let mut dentists: Vec<StaffMember> = repo
        .list_staff()
        .await
        .map_err(|err| {
            log::error!("Failed to list staff: {err}");
            err
        })?
        .into_iter()
        .filter(|member| member.active && member.role() == Role::Dentist)
        .collect();
    dentists.sort_by_cached_key(|m| (fold_name(&m.last_name), fold_name(&m.first_name)));
    Ok(dentists)
}

fn matches(member: &StaffMember, query: &str) -> bool {
    let query = fold_name(query);
    fold_name(&member.full_name()).contains(&query)
        || member.dni.contains(&query)
        || member
            .username
            .as_deref()
            .is_some_and(|u| fold_name(u).contains(&query))
}

pub async fn list_staff<R>(
    query: StaffQuery,
    per_page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StaffPageData>
where
    R: StaffReader + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut staff: Vec<StaffMember> = repo
        .list_staff()
        .await
        .map_err(|err| {
            log::error!("Failed to list staff: {err}");
            err
        })?
        .into_iter()
        .filter(|m| search_query.as_deref().is_none_or(|q| matches(m, q)))
        .collect();
    staff.sort_by_cached_key(|m| (fold_name(&m.last_name), fold_name(&m.first_name)));

    Ok(StaffPageData {
        staff: Paginated::from_all(staff, query.page.unwrap_or(1), per_page),
        search_query,
    })
}

pub async fn load_staff_form<R>(
    id: Option<StaffId>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StaffFormData>
where
    R: StaffReader + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    let member = match id {
        Some(id) => Some(
            repo.get_staff(id)
                .await
                .map_err(|err| {
                    log::error!("Failed to get staff member {id}: {err}");
                    err
                })?
                .ok_or(ServiceError::NotFound)?,
        ),
        None => None,
    };
    let positions = repo.list_positions().await.map_err(|err| {
        log::error!("Failed to list positions: {err}");
        err
    })?;
    let specialties = repo.list_specialties().await.map_err(|err| {
        log::error!("Failed to list specialties: {err}");
        err
    })?;

    Ok(StaffFormData {
        member,
        positions,
        specialties,
    })
}

/// Creates a staff member. New members need login credentials.
pub async fn create_staff<R>(
    form: StaffForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StaffMember>
where
    R: StaffWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    let member = NewStaffMember::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;
    if member.username.is_none() || member.password.is_none() {
        return Err(ServiceError::Form(
            "Usuario y contraseña son obligatorios para el nuevo personal.".to_string(),
        ));
    }

    let created = repo.create_staff(&member).await.map_err(|err| {
        log::error!("Failed to create staff member: {err}");
        err
    })?;
    log::info!("Staff member {} created by {}", created.id, user.id);
    Ok(created)
}

pub async fn update_staff<R>(
    id: StaffId,
    form: StaffForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StaffMember>
where
    R: StaffWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    let member = NewStaffMember::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let updated = repo.update_staff(id, &member).await.map_err(|err| {
        log::error!("Failed to update staff member {id}: {err}");
        err
    })?;
    Ok(updated)
}

/// Activates or deactivates a member. Users cannot deactivate themselves.
pub async fn set_staff_active<R>(
    id: StaffId,
    active: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: StaffWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    if !active && id == user.id {
        return Err(ServiceError::Warning(
            "No puede desactivar su propio usuario.".to_string(),
        ));
    }

    repo.set_staff_active(id, active).await.map_err(|err| {
        log::error!("Failed to set staff member {id} active={active}: {err}");
        err
    })?;
    Ok(())
}

pub async fn delete_staff<R>(id: StaffId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: StaffWriter + ?Sized,
{
    ensure_capability(user, Capability::ManageStaff)?;

    if id == user.id {
        return Err(ServiceError::Warning(
            "No puede eliminar su propio usuario.".to_string(),
        ));
    }

    repo.delete_staff(id).await.map_err(|err| {
        log::error!("Failed to delete staff member {id}: {err}");
        err
    })?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::catalog::CatalogItem;
    use crate::domain::types::{CatalogItemId, CatalogName};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::IN_USE_MESSAGE;
    use crate::services::fixtures::{admin, secretary};

    pub(crate) fn member(id: i32, first: &str, last: &str, position: &str, active: bool) -> StaffMember {
        StaffMember {
            id: StaffId::new(id).expect("valid id"),
            dni: format!("2011122{id}"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: None,
            email: None,
            address: None,
            license_number: None,
            username: Some(format!("user{id}")),
            position: Some(CatalogItem {
                id: CatalogItemId::new(1).expect("valid id"),
                name: CatalogName::new(position).expect("valid name"),
            }),
            specialties: vec![],
            hired_on: None,
            active,
        }
    }

    fn form() -> StaffForm {
        StaffForm {
            dni: "30111222".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            email: "ana@example.com".to_string(),
            position_id: 2,
            ..StaffForm::default()
        }
    }

    #[actix_web::test]
    async fn only_active_dentists_are_offered() {
        let mut repo = MockRepository::new();
        repo.expect_list_staff().returning(|| {
            Ok(vec![
                member(1, "Laura", "Gómez", "Odontólogo/a", true),
                member(2, "Juan", "Álvarez", "Odontologo/a", true),
                member(3, "Rita", "Sosa", "Odontólogo/a", false),
                member(4, "Eva", "Díaz", "Secretario/a", true),
            ])
        });

        let dentists = active_dentists(&repo).await.expect("should list dentists");

        let ids: Vec<i32> = dentists.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[actix_web::test]
    async fn search_ignores_accents() {
        let mut repo = MockRepository::new();
        repo.expect_list_staff().returning(|| {
            Ok(vec![
                member(1, "Laura", "Gómez", "Admin", true),
                member(2, "Juan", "Álvarez", "Admin", true),
            ])
        });
        let query = StaffQuery {
            q: Some("gomez".to_string()),
            page: None,
        };

        let data = list_staff(query, 20, &admin(), &repo)
            .await
            .expect("should list staff");

        assert_eq!(data.staff.items.len(), 1);
        assert_eq!(data.staff.items[0].id.get(), 1);
    }

    #[actix_web::test]
    async fn secretary_cannot_manage_staff() {
        let repo = MockRepository::new();

        let result = list_staff(StaffQuery::default(), 20, &secretary(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn new_member_needs_credentials() {
        let mut repo = MockRepository::new();
        repo.expect_create_staff().times(0);

        let result = create_staff(form(), &admin(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn create_posts_member() {
        let mut repo = MockRepository::new();
        repo.expect_create_staff()
            .withf(|m| m.username.as_ref().is_some_and(|u| u.as_str() == "aperez"))
            .times(1)
            .returning(|_| Ok(member(9, "Ana", "Pérez", "Secretario/a", true)));
        let mut form = form();
        form.username = "aperez".to_string();
        form.password = "clave-segura".to_string();

        let created = create_staff(form, &admin(), &repo)
            .await
            .expect("should create member");

        assert_eq!(created.id.get(), 9);
    }

    #[actix_web::test]
    async fn admin_cannot_delete_self() {
        let mut repo = MockRepository::new();
        repo.expect_delete_staff().times(0);
        let user = admin();

        let result = delete_staff(user.id, &user, &repo).await;

        assert!(matches!(result, Err(ServiceError::Warning(_))));
    }

    #[actix_web::test]
    async fn member_with_history_cannot_be_deleted() {
        let mut repo = MockRepository::new();
        repo.expect_delete_staff()
            .times(1)
            .returning(|_| Err(RepositoryError::InUse("turnos".to_string())));

        let result = delete_staff(StaffId::new(5).expect("valid id"), &admin(), &repo).await;

        assert!(matches!(result, Err(ServiceError::InUse(msg)) if msg == IN_USE_MESSAGE));
    }
}
