use serde::Serialize;

use crate::domain::staff::StaffMember;

#[derive(Debug, Serialize)]
pub struct ProfilePageData {
    pub member: StaffMember,
    pub role_label: String,
}
