//! Payment and appointment audit logs kept by the backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AppointmentId, AuditEntryId, ClinicalRecordId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentAuditAction {
    #[serde(rename = "REGISTRO")]
    Registered,
    #[serde(rename = "CANCELACION")]
    Cancelled,
}

impl PaymentAuditAction {
    pub const ALL: [PaymentAuditAction; 2] =
        [PaymentAuditAction::Registered, PaymentAuditAction::Cancelled];

    pub fn code(self) -> &'static str {
        match self {
            PaymentAuditAction::Registered => "REGISTRO",
            PaymentAuditAction::Cancelled => "CANCELACION",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentAuditAction::Registered => "Registrado",
            PaymentAuditAction::Cancelled => "Cancelado",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentAuditAction {
    #[serde(rename = "CREACION")]
    Created,
    #[serde(rename = "MODIFICACION")]
    Rescheduled,
    #[serde(rename = "CAMBIO_ESTADO")]
    StatusChanged,
    #[serde(rename = "ELIMINACION")]
    Deleted,
}

impl AppointmentAuditAction {
    pub const ALL: [AppointmentAuditAction; 4] = [
        AppointmentAuditAction::Created,
        AppointmentAuditAction::Rescheduled,
        AppointmentAuditAction::StatusChanged,
        AppointmentAuditAction::Deleted,
    ];

    pub fn code(self) -> &'static str {
        match self {
            AppointmentAuditAction::Created => "CREACION",
            AppointmentAuditAction::Rescheduled => "MODIFICACION",
            AppointmentAuditAction::StatusChanged => "CAMBIO_ESTADO",
            AppointmentAuditAction::Deleted => "ELIMINACION",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppointmentAuditAction::Created => "Turno agendado",
            AppointmentAuditAction::Rescheduled => "Reprogramado",
            AppointmentAuditAction::StatusChanged => "Cambio de estado",
            AppointmentAuditAction::Deleted => "Eliminado",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentAuditEntry {
    pub id: AuditEntryId,
    pub action: PaymentAuditAction,
    pub timestamp: DateTime<Utc>,
    pub payment_type_name: Option<String>,
    pub patient_name: Option<String>,
    pub patient_dni: Option<String>,
    pub record_id: Option<ClinicalRecordId>,
    pub user_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentAuditEntry {
    pub id: AuditEntryId,
    pub action: AppointmentAuditAction,
    pub timestamp: DateTime<Utc>,
    pub appointment_id: Option<AppointmentId>,
    pub patient_name: Option<String>,
    pub patient_dni: Option<String>,
    pub dentist_name: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    pub slot_label: Option<String>,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub user_name: Option<String>,
}

impl AppointmentAuditEntry {
    /// Status transition as shown in the log, `None` when nothing changed.
    pub fn status_change(&self) -> Option<(&str, &str)> {
        match (self.previous_status.as_deref(), self.new_status.as_deref()) {
            (Some(before), Some(after)) if before != after => Some((before, after)),
            _ => None,
        }
    }
}

/// Server-side filters of the audit pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub page: usize,
    pub action: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub record_id: Option<ClinicalRecordId>,
}

impl AuditQuery {
    pub fn new(page: usize) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    /// Query string pairs using the backend parameter names.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];
        if let Some(action) = self.action.as_deref().filter(|a| !a.is_empty()) {
            pairs.push(("accion", action.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("fecha_desde", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("fecha_hasta", to.to_string()));
        }
        if let Some(record_id) = self.record_id {
            pairs.push(("hist_clin_id", record_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_empty_filters() {
        let mut query = AuditQuery::new(0);
        assert_eq!(query.to_pairs(), vec![("page", "1".to_string())]);

        query.page = 3;
        query.action = Some("REGISTRO".to_string());
        query.from = NaiveDate::from_ymd_opt(2024, 1, 1);
        query.record_id = ClinicalRecordId::new(12).ok();

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "3".to_string()),
                ("accion", "REGISTRO".to_string()),
                ("fecha_desde", "2024-01-01".to_string()),
                ("hist_clin_id", "12".to_string()),
            ]
        );
    }

    #[test]
    fn actions_use_backend_codes() {
        let action: AppointmentAuditAction = serde_json::from_str("\"CAMBIO_ESTADO\"").unwrap();
        assert_eq!(action, AppointmentAuditAction::StatusChanged);
        assert_eq!(action.code(), "CAMBIO_ESTADO");
        assert_eq!(PaymentAuditAction::Cancelled.code(), "CANCELACION");
    }
}
