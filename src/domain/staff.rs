use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::capabilities::Role;
use crate::domain::catalog::CatalogItem;
use crate::domain::types::{CatalogItemId, Dni, Email, PersonName, PhoneNumber, StaffId, Username};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffMember {
    pub id: StaffId,
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Professional license (matrícula), dentists only.
    pub license_number: Option<String>,
    pub username: Option<String>,
    pub position: Option<CatalogItem>,
    pub specialties: Vec<CatalogItem>,
    pub hired_on: Option<NaiveDate>,
    pub active: bool,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> Role {
        self.position
            .as_ref()
            .map_or(Role::Unknown, |p| Role::from_position(p.name.as_str()))
    }
}

/// Staff data posted on create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStaffMember {
    pub dni: Dni,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: Option<PhoneNumber>,
    pub email: Email,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub position_id: CatalogItemId,
    pub specialty_ids: Vec<CatalogItemId>,
    /// Login credentials; only sent when creating or explicitly changed.
    pub username: Option<Username>,
    pub password: Option<String>,
}

/// Contact data a user may change on their own profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub phone: Option<PhoneNumber>,
    pub email: Email,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: Username,
    pub password: String,
}

/// Completion of the e-mailed password reset link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordReset {
    pub uid: String,
    pub token: String,
    pub new_password: String,
}
