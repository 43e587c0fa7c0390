//! The user's own profile.

use crate::domain::staff::{PasswordChange, ProfileUpdate, StaffMember};
use crate::dto::profile::ProfilePageData;
use crate::forms::profile::{PasswordForm, ProfileForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{StaffReader, StaffWriter};
use crate::services::{ServiceError, ServiceResult};

/// Profile of the logged in user. Every role may see and edit its own.
pub async fn load_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<ProfilePageData>
where
    R: StaffReader + ?Sized,
{
    let member = repo
        .get_staff(user.id)
        .await
        .map_err(|err| {
            log::error!("Failed to get profile of {}: {err}", user.id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(ProfilePageData {
        role_label: member.role().label().to_string(),
        member,
    })
}

/// Updates contact data and returns the fresh record for the session.
pub async fn update_profile<R>(
    form: ProfileForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<StaffMember>
where
    R: StaffWriter + ?Sized,
{
    let update = ProfileUpdate::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let member = repo.update_profile(user.id, &update).await.map_err(|err| {
        log::error!("Failed to update profile of {}: {err}", user.id);
        err
    })?;
    Ok(member)
}

pub async fn change_password<R>(
    form: PasswordForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: StaffWriter + ?Sized,
{
    let change = PasswordChange::try_from(form).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    repo.change_password(user.id, &change).await.map_err(|err| {
        log::error!("Failed to change password of {}: {err}", user.id);
        err
    })?;
    log::info!("Password changed for user {}", user.id);
    Ok(())
}
