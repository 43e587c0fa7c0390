//! Login and password recovery.

use crate::domain::staff::{Credentials, PasswordReset};
use crate::domain::types::Email;
use crate::forms::auth::{ForgotPasswordForm, LoginForm, ResetPasswordForm};
use crate::models::auth::{AuthenticatedUser, ClinicSession};
use crate::repository::AuthApi;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

pub const BAD_CREDENTIALS: &str = "Usuario o contraseña incorrectos.";
pub const INACTIVE_USER: &str = "El usuario está dado de baja.";

/// Exchanges credentials for a token pair and loads the staff member
/// behind it.
pub async fn login<R>(form: LoginForm, repo: &R) -> ServiceResult<ClinicSession>
where
    R: AuthApi + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    let tokens = repo.login(&credentials).await.map_err(|err| match err {
        RepositoryError::Unauthorized | RepositoryError::Validation(_) => {
            log::info!("Rejected login for {}", credentials.username.as_str());
            ServiceError::Form(BAD_CREDENTIALS.to_string())
        }
        err => {
            log::error!("Failed to log in: {err}");
            err.into()
        }
    })?;

    let member = repo
        .fetch_current_user(&tokens.access)
        .await
        .map_err(|err| {
            log::error!("Failed to load the current user: {err}");
            err
        })?;

    if !member.active {
        return Err(ServiceError::Form(INACTIVE_USER.to_string()));
    }

    Ok(ClinicSession::new(tokens, AuthenticatedUser::from(&member)))
}

/// Asks the backend to e-mail a reset link.
pub async fn request_password_reset<R>(form: ForgotPasswordForm, repo: &R) -> ServiceResult<()>
where
    R: AuthApi + ?Sized,
{
    let email = Email::try_from(form)?;

    repo.request_password_reset(&email).await.map_err(|err| {
        log::error!("Failed to request a password reset: {err}");
        err
    })?;

    Ok(())
}

pub async fn reset_password<R>(form: ResetPasswordForm, repo: &R) -> ServiceResult<()>
where
    R: AuthApi + ?Sized,
{
    let reset = PasswordReset::try_from(form)?;

    repo.confirm_password_reset(&reset).await.map_err(|err| {
        log::error!("Failed to reset password: {err}");
        match err {
            RepositoryError::Unauthorized | RepositoryError::NotFound => ServiceError::Form(
                "El enlace de recuperación no es válido o expiró.".to_string(),
            ),
            err => err.into(),
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capabilities::Role;
    use crate::domain::catalog::CatalogItem;
    use crate::domain::staff::StaffMember;
    use crate::domain::types::{CatalogItemId, CatalogName, StaffId};
    use crate::models::auth::TokenPair;
    use crate::repository::mock::MockRepository;

    fn member(active: bool) -> StaffMember {
        StaffMember {
            id: StaffId::new(4).expect("valid id"),
            dni: "20111222".to_string(),
            first_name: "Laura".to_string(),
            last_name: "Gómez".to_string(),
            phone: None,
            email: None,
            address: None,
            license_number: Some("MP-1".to_string()),
            username: Some("lgomez".to_string()),
            position: Some(CatalogItem {
                id: CatalogItemId::new(3).expect("valid id"),
                name: CatalogName::new("Odontólogo/a").expect("valid name"),
            }),
            specialties: vec![],
            hired_on: None,
            active,
        }
    }

    fn form() -> LoginForm {
        LoginForm {
            username: "lgomez".to_string(),
            password: "secreto".to_string(),
        }
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access: "acc".to_string(),
            refresh: "ref".to_string(),
        }
    }

    #[actix_web::test]
    async fn login_builds_the_session() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|credentials| credentials.username.as_str() == "lgomez")
            .times(1)
            .returning(|_| Ok(tokens()));
        repo.expect_fetch_current_user()
            .withf(|access| access == "acc")
            .times(1)
            .returning(|_| Ok(member(true)));

        let session = login(form(), &repo).await.expect("should log in");

        assert_eq!(session.access_token(), "acc");
        assert_eq!(session.user.role, Role::Dentist);
        assert_eq!(session.user.name, "Laura Gómez");
    }

    #[actix_web::test]
    async fn wrong_password_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .times(1)
            .returning(|_| Err(RepositoryError::Unauthorized));
        repo.expect_fetch_current_user().times(0);

        let result = login(form(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg == BAD_CREDENTIALS));
    }

    #[actix_web::test]
    async fn inactive_staff_cannot_log_in() {
        let mut repo = MockRepository::new();
        repo.expect_login().times(1).returning(|_| Ok(tokens()));
        repo.expect_fetch_current_user()
            .times(1)
            .returning(|_| Ok(member(false)));

        let result = login(form(), &repo).await;

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg == INACTIVE_USER));
    }

    #[actix_web::test]
    async fn reset_checks_confirmation_before_calling_backend() {
        let mut repo = MockRepository::new();
        repo.expect_confirm_password_reset().times(0);

        let form = ResetPasswordForm {
            uid: "MQ".to_string(),
            token: "tok".to_string(),
            password: "una-clave-larga".to_string(),
            confirm_password: "distinta-clave".to_string(),
        };

        assert!(matches!(
            reset_password(form, &repo).await,
            Err(ServiceError::Form(_))
        ));
    }
}
