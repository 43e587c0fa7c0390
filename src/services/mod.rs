//! Use cases behind the routes.
//!
//! Services check the user's capabilities, convert forms into domain
//! payloads and talk to the backend through the repository traits. They
//! never touch actix types, so they run against `MockRepository` in tests.

use thiserror::Error;

use crate::domain::appointment::SlotError;
use crate::domain::capabilities::Capability;
use crate::domain::odontogram::OdontogramError;
use crate::domain::treatment_plan::PlanWarning;
use crate::forms::FormError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod appointments;
pub mod audit;
pub mod auth;
pub mod catalogs;
pub mod dashboard;
pub mod patients;
pub mod payments;
pub mod profile;
pub mod records;
pub mod staff;

pub const IN_USE_MESSAGE: &str = "El elemento está en uso, no se puede eliminar.";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The user's role lacks the capability.
    #[error("unauthorized")]
    Unauthorized,
    /// The backend rejected the access token.
    #[error("session expired")]
    SessionExpired,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Form(String),
    /// Rejected action that is not an error, shown as a warning.
    #[error("{0}")]
    Warning(String),
    #[error("{0}")]
    InUse(String),
    #[error("type constraint: {0}")]
    TypeConstraint(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unauthorized => ServiceError::SessionExpired,
            RepositoryError::Forbidden => ServiceError::Unauthorized,
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Validation(fields) => ServiceError::Form(fields.to_string()),
            RepositoryError::InUse(_) => ServiceError::InUse(IN_USE_MESSAGE.to_string()),
            RepositoryError::Network(msg) | RepositoryError::Unexpected(msg) => {
                ServiceError::Internal(msg)
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<PlanWarning> for ServiceError {
    fn from(warning: PlanWarning) -> Self {
        ServiceError::Warning(warning.to_string())
    }
}

impl From<SlotError> for ServiceError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::UnknownSlot => ServiceError::Form(err.to_string()),
            _ => ServiceError::Warning(err.to_string()),
        }
    }
}

impl From<OdontogramError> for ServiceError {
    fn from(err: OdontogramError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless `user` may `capability`.
pub fn ensure_capability(user: &AuthenticatedUser, capability: Capability) -> ServiceResult<()> {
    if user.can(capability) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

#[cfg(any(test, feature = "test-mocks"))]
pub mod fixtures {
    //! Users and entities shared by the service tests.

    use crate::domain::capabilities::{Capabilities, Role};
    use crate::domain::types::StaffId;
    use crate::models::auth::AuthenticatedUser;

    pub fn user(id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: StaffId::new(id).expect("valid staff id"),
            name: format!("{} {id}", role.label()),
            email: None,
            role,
            role_label: role.label().to_string(),
            capabilities: Capabilities::for_role(role),
        }
    }

    pub fn admin() -> AuthenticatedUser {
        user(1, Role::Admin)
    }

    pub fn secretary() -> AuthenticatedUser {
        user(2, Role::Secretary)
    }

    pub fn dentist() -> AuthenticatedUser {
        user(3, Role::Dentist)
    }
}
