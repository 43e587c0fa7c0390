use serde::Deserialize;
use validator::Validate;

use crate::domain::staff::NewStaffMember;
use crate::domain::types::{CatalogItemId, Dni, Email, PersonName, PhoneNumber, Username};
use crate::forms::{FormError, non_blank};

/// Create and edit form of a staff member.
///
/// Username and password are optional on edit; an empty password keeps the
/// current one.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StaffForm {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub license_number: String,
    pub position_id: i32,
    #[serde(default)]
    pub specialty_ids: Vec<i32>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_password"))]
    pub password: String,
}

fn validate_optional_password(password: &str) -> Result<(), validator::ValidationError> {
    if password.is_empty() || password.chars().count() >= 8 {
        Ok(())
    } else {
        Err(validator::ValidationError::new("password_too_short"))
    }
}

impl TryFrom<StaffForm> for NewStaffMember {
    type Error = FormError;

    fn try_from(form: StaffForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mut specialty_ids = form
            .specialty_ids
            .iter()
            .map(|&id| CatalogItemId::new(id))
            .collect::<Result<Vec<_>, _>>()?;
        specialty_ids.sort_unstable();
        specialty_ids.dedup();

        Ok(NewStaffMember {
            dni: Dni::new(form.dni)?,
            first_name: PersonName::new(form.first_name)?,
            last_name: PersonName::new(form.last_name)?,
            phone: non_blank(&form.phone).map(PhoneNumber::new).transpose()?,
            email: Email::new(form.email)?,
            address: non_blank(&form.address),
            license_number: non_blank(&form.license_number),
            position_id: CatalogItemId::new(form.position_id)?,
            specialty_ids,
            username: non_blank(&form.username).map(Username::new).transpose()?,
            password: (!form.password.is_empty()).then_some(form.password),
        })
    }
}
