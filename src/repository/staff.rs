use reqwest::Method;

use crate::domain::catalog::CatalogItem;
use crate::domain::staff::{NewStaffMember, PasswordChange, ProfileUpdate, StaffMember};
use crate::domain::types::StaffId;
use crate::models::catalog::CatalogRow;
use crate::models::staff::{
    NewStaffMember as WireNewStaffMember, PasswordChange as WirePasswordChange,
    ProfileUpdate as WireProfileUpdate, StaffActivity, StaffMember as WireStaffMember,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::rest::convert_all;
use crate::repository::{RestRepository, StaffReader, StaffWriter};

impl StaffReader for RestRepository {
    async fn list_staff(&self) -> RepositoryResult<Vec<StaffMember>> {
        let rows: Vec<WireStaffMember> = self.get_list("personal/", &[]).await?;
        convert_all(rows)
    }

    async fn get_staff(&self, id: StaffId) -> RepositoryResult<Option<StaffMember>> {
        let row: Option<WireStaffMember> = self.get_optional(&format!("personal/{id}/")).await?;
        Ok(row.map(StaffMember::try_from).transpose()?)
    }

    async fn list_positions(&self) -> RepositoryResult<Vec<CatalogItem>> {
        let rows: Vec<CatalogRow> = self.get_list("personal/puestos/", &[]).await?;
        convert_all(rows)
    }

    async fn list_specialties(&self) -> RepositoryResult<Vec<CatalogItem>> {
        let rows: Vec<CatalogRow> = self.get_list("personal/especialidades/", &[]).await?;
        convert_all(rows)
    }
}

impl StaffWriter for RestRepository {
    async fn create_staff(&self, member: &NewStaffMember) -> RepositoryResult<StaffMember> {
        let row: WireStaffMember = self
            .send(Method::POST, "personal/", &WireNewStaffMember::from(member))
            .await?;
        Ok(StaffMember::try_from(row)?)
    }

    async fn update_staff(
        &self,
        id: StaffId,
        member: &NewStaffMember,
    ) -> RepositoryResult<StaffMember> {
        let row: WireStaffMember = self
            .send(
                Method::PATCH,
                &format!("personal/{id}/"),
                &WireNewStaffMember::from(member),
            )
            .await?;
        Ok(StaffMember::try_from(row)?)
    }

    async fn set_staff_active(&self, id: StaffId, active: bool) -> RepositoryResult<()> {
        self.send_discard(
            Method::PATCH,
            &format!("personal/{id}/"),
            &StaffActivity { activo: active },
        )
        .await
    }

    async fn delete_staff(&self, id: StaffId) -> RepositoryResult<()> {
        self.delete(&format!("personal/{id}/")).await
    }

    async fn update_profile(
        &self,
        id: StaffId,
        update: &ProfileUpdate,
    ) -> RepositoryResult<StaffMember> {
        let row: WireStaffMember = self
            .send(
                Method::PATCH,
                &format!("personal/{id}/"),
                &WireProfileUpdate::from(update),
            )
            .await?;
        Ok(StaffMember::try_from(row)?)
    }

    async fn change_password(&self, id: StaffId, change: &PasswordChange) -> RepositoryResult<()> {
        self.send_discard(
            Method::PATCH,
            &format!("personal/{id}/"),
            &WirePasswordChange::from(change),
        )
        .await
    }
}
