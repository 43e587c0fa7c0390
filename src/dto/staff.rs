use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItem;
use crate::domain::staff::StaffMember;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct StaffQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the staff list.
#[derive(Debug, Serialize)]
pub struct StaffPageData {
    pub staff: Paginated<StaffMember>,
    pub search_query: Option<String>,
}

/// Select options of the staff form, plus the member when editing.
#[derive(Debug, Serialize)]
pub struct StaffFormData {
    pub member: Option<StaffMember>,
    pub positions: Vec<CatalogItem>,
    pub specialties: Vec<CatalogItem>,
}
