use serde::Deserialize;
use validator::Validate;

use crate::domain::staff::{Credentials, PasswordReset};
use crate::domain::types::{Email, Username};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Credentials {
            username: Username::new(form.username)?,
            password: form.password,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for Email {
    type Error = FormError;

    fn try_from(form: ForgotPasswordForm) -> Result<Self, Self::Error> {
        Ok(Email::new(form.email)?)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    pub uid: String,
    pub token: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub confirm_password: String,
}

impl TryFrom<ResetPasswordForm> for PasswordReset {
    type Error = FormError;

    fn try_from(form: ResetPasswordForm) -> Result<Self, Self::Error> {
        if form.password != form.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        form.validate()?;
        Ok(PasswordReset {
            uid: form.uid,
            token: form.token,
            new_password: form.password,
        })
    }
}
