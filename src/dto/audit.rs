use serde::Serialize;

use crate::domain::audit::{AppointmentAuditEntry, PaymentAuditEntry};
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct ActionOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Filters echoed back into the audit forms and pager links.
#[derive(Debug, Default, Serialize)]
pub struct AuditFilters {
    pub accion: Option<String>,
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
    pub hist_clin_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PaymentAuditPageData {
    pub entries: Paginated<PaymentAuditEntry>,
    pub actions: Vec<ActionOption>,
    pub filters: AuditFilters,
}

#[derive(Debug, Serialize)]
pub struct AppointmentAuditPageData {
    pub entries: Paginated<AppointmentAuditEntry>,
    pub actions: Vec<ActionOption>,
    pub filters: AuditFilters,
}
