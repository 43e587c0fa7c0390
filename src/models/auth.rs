//! The clinic session: backend tokens plus the current user.
//!
//! The session is created on login, stored in the signed session cookie and
//! purged on logout or as soon as the backend rejects the access token.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_session::{Session, SessionExt, SessionInsertError};
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::capabilities::{Capabilities, Capability, Role};
use crate::domain::staff::{Credentials, PasswordReset, StaffMember};
use crate::domain::types::{Email, StaffId};

const SESSION_KEY: &str = "clinic_session";

/// Token pair returned by the login endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetConfirm<'a> {
    pub uid: &'a str,
    pub token: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: credentials.username.as_str(),
            password: credentials.password.as_str(),
        }
    }
}

impl<'a> From<&'a Email> for PasswordResetRequest<'a> {
    fn from(email: &'a Email) -> Self {
        Self {
            email: email.as_str(),
        }
    }
}

impl<'a> From<&'a PasswordReset> for PasswordResetConfirm<'a> {
    fn from(reset: &'a PasswordReset) -> Self {
        Self {
            uid: reset.uid.as_str(),
            token: reset.token.as_str(),
            new_password: reset.new_password.as_str(),
            confirm_password: reset.new_password.as_str(),
        }
    }
}

/// Logged in staff member with the capabilities of their role.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: StaffId,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub role_label: String,
    pub capabilities: Capabilities,
}

impl AuthenticatedUser {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.allows(capability)
    }
}

impl From<&StaffMember> for AuthenticatedUser {
    fn from(member: &StaffMember) -> Self {
        let role = member.role();
        Self {
            id: member.id,
            name: member.full_name(),
            email: member.email.clone(),
            role,
            role_label: role.label().to_string(),
            capabilities: Capabilities::for_role(role),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicSession {
    pub tokens: TokenPair,
    pub user: AuthenticatedUser,
}

impl ClinicSession {
    pub fn new(tokens: TokenPair, user: AuthenticatedUser) -> Self {
        Self { tokens, user }
    }

    pub fn load(session: &Session) -> Option<Self> {
        session.get::<Self>(SESSION_KEY).ok().flatten()
    }

    pub fn store(&self, session: &Session) -> Result<(), SessionInsertError> {
        session.insert(SESSION_KEY, self)
    }

    pub fn access_token(&self) -> &str {
        &self.tokens.access
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, Error> {
        req.get_identity()
            .map_err(|_| actix_web::error::ErrorUnauthorized("not logged in"))?;
        Self::load(&req.get_session())
            .ok_or_else(|| actix_web::error::ErrorUnauthorized("session missing"))
    }
}

impl FromRequest for ClinicSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(ClinicSession::from_http_request(req).map(|session| session.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CatalogItem;
    use crate::domain::types::{CatalogItemId, CatalogName, Username};

    fn member(position: &str) -> StaffMember {
        StaffMember {
            id: StaffId::new(3).unwrap(),
            dni: "20111222".to_string(),
            first_name: "Laura".to_string(),
            last_name: "Gómez".to_string(),
            phone: None,
            email: Some("laura@example.com".to_string()),
            address: None,
            license_number: None,
            username: None,
            position: Some(CatalogItem {
                id: CatalogItemId::new(1).unwrap(),
                name: CatalogName::new(position).unwrap(),
            }),
            specialties: vec![],
            hired_on: None,
            active: true,
        }
    }

    #[test]
    fn user_capabilities_follow_position() {
        let user = AuthenticatedUser::from(&member("Secretario/a"));
        assert_eq!(user.role, Role::Secretary);
        assert_eq!(user.name, "Laura Gómez");
        assert!(user.can(Capability::ScheduleAnyDentist));
        assert!(!user.can(Capability::ManageRecords));

        let user = AuthenticatedUser::from(&member("Recepción"));
        assert_eq!(user.capabilities, Capabilities::default());
    }

    #[test]
    fn reset_confirmation_repeats_password() {
        let reset = PasswordReset {
            uid: "MQ".to_string(),
            token: "abc".to_string(),
            new_password: "nueva-clave".to_string(),
        };
        let json = serde_json::to_value(PasswordResetConfirm::from(&reset)).unwrap();
        assert_eq!(json["new_password"], json["confirm_password"]);

        let credentials = Credentials {
            username: Username::new("lgomez").unwrap(),
            password: "x".to_string(),
        };
        let json = serde_json::to_value(LoginRequest::from(&credentials)).unwrap();
        assert_eq!(json["username"], "lgomez");
    }
}
