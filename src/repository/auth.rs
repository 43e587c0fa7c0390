use reqwest::Method;

use crate::domain::staff::{Credentials, PasswordReset, StaffMember};
use crate::domain::types::Email;
use crate::models::auth::{LoginRequest, PasswordResetConfirm, PasswordResetRequest, TokenPair};
use crate::models::staff::StaffMember as WireStaffMember;
use crate::repository::errors::RepositoryResult;
use crate::repository::{AuthApi, RestRepository};

impl AuthApi for RestRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<TokenPair> {
        self.send(
            Method::POST,
            "personal/auth/login/",
            &LoginRequest::from(credentials),
        )
        .await
    }

    async fn fetch_current_user(&self, access: &str) -> RepositoryResult<StaffMember> {
        let row: WireStaffMember = self.with_token(access).get("personal/me/", &[]).await?;
        Ok(StaffMember::try_from(row)?)
    }

    async fn request_password_reset(&self, email: &Email) -> RepositoryResult<()> {
        self.send_discard(
            Method::POST,
            "personal/auth/password-reset/",
            &PasswordResetRequest::from(email),
        )
        .await
    }

    async fn confirm_password_reset(&self, reset: &PasswordReset) -> RepositoryResult<()> {
        self.send_discard(
            Method::POST,
            "personal/auth/password-reset-confirm/",
            &PasswordResetConfirm::from(reset),
        )
        .await
    }
}
