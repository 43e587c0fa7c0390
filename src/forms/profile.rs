use serde::Deserialize;
use validator::Validate;

use crate::domain::staff::{PasswordChange, ProfileUpdate};
use crate::domain::types::{Email, PhoneNumber};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl TryFrom<ProfileForm> for ProfileUpdate {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        Ok(ProfileUpdate {
            phone: non_blank(&form.phone).map(PhoneNumber::new).transpose()?,
            email: Email::new(form.email)?,
            address: non_blank(&form.address),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
    pub confirm_password: String,
}

impl TryFrom<PasswordForm> for PasswordChange {
    type Error = FormError;

    fn try_from(form: PasswordForm) -> Result<Self, Self::Error> {
        if form.new_password != form.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        form.validate()?;
        Ok(PasswordChange {
            current_password: form.current_password,
            new_password: form.new_password,
        })
    }
}
