//! Role-based view model.
//!
//! A staff member's position decides a fixed set of capabilities. The set is
//! computed once per request and drives both the sidebar and service-level
//! authorization.

use serde::{Deserialize, Serialize};

use crate::domain::types::fold_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Secretary,
    Dentist,
    Unknown,
}

impl Role {
    /// Parses the backend position name (`Admin`, `Secretario/a`, `Odontólogo/a`).
    pub fn from_position(name: &str) -> Self {
        match fold_name(name).as_str() {
            "admin" | "administrador" | "administrador/a" => Role::Admin,
            "secretario/a" | "secretario" | "secretaria" => Role::Secretary,
            "odontologo/a" | "odontologo" | "odontologa" => Role::Dentist,
            _ => Role::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Secretary => "Secretario/a",
            Role::Dentist => "Odontólogo/a",
            Role::Unknown => "Sin rol",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewDashboard,
    ManagePatients,
    ManageRecords,
    ManagePayments,
    ScheduleAnyDentist,
    ManageSchedule,
    ManageCatalogs,
    ManageStaff,
    ViewAudit,
}

/// Permitted actions of the current user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub view_dashboard: bool,
    pub manage_patients: bool,
    pub manage_records: bool,
    pub manage_payments: bool,
    pub schedule_any_dentist: bool,
    pub manage_schedule: bool,
    pub manage_catalogs: bool,
    pub manage_staff: bool,
    pub view_audit: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                view_dashboard: true,
                manage_patients: true,
                manage_records: true,
                manage_payments: true,
                schedule_any_dentist: true,
                manage_schedule: true,
                manage_catalogs: true,
                manage_staff: true,
                view_audit: true,
            },
            Role::Secretary => Self {
                view_dashboard: true,
                manage_patients: true,
                manage_payments: true,
                schedule_any_dentist: true,
                ..Self::default()
            },
            Role::Dentist => Self {
                view_dashboard: true,
                manage_patients: true,
                manage_records: true,
                manage_payments: true,
                ..Self::default()
            },
            Role::Unknown => Self::default(),
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewDashboard => self.view_dashboard,
            Capability::ManagePatients => self.manage_patients,
            Capability::ManageRecords => self.manage_records,
            Capability::ManagePayments => self.manage_payments,
            Capability::ScheduleAnyDentist => self.schedule_any_dentist,
            Capability::ManageSchedule => self.manage_schedule,
            Capability::ManageCatalogs => self.manage_catalogs,
            Capability::ManageStaff => self.manage_staff,
            Capability::ViewAudit => self.view_audit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_position_names() {
        assert_eq!(Role::from_position("Admin"), Role::Admin);
        assert_eq!(Role::from_position("SECRETARIO/A"), Role::Secretary);
        assert_eq!(Role::from_position("Odontólogo/a"), Role::Dentist);
        assert_eq!(Role::from_position("odontologo/a"), Role::Dentist);
        assert_eq!(Role::from_position("Recepción"), Role::Unknown);
    }

    #[test]
    fn capability_table_per_role() {
        let admin = Capabilities::for_role(Role::Admin);
        let secretary = Capabilities::for_role(Role::Secretary);
        let dentist = Capabilities::for_role(Role::Dentist);

        assert!(admin.allows(Capability::ViewAudit));
        assert!(admin.allows(Capability::ManageStaff));

        assert!(secretary.allows(Capability::ScheduleAnyDentist));
        assert!(!secretary.allows(Capability::ManageRecords));
        assert!(!secretary.allows(Capability::ManageCatalogs));

        assert!(dentist.allows(Capability::ManageRecords));
        assert!(!dentist.allows(Capability::ScheduleAnyDentist));
        assert!(!dentist.allows(Capability::ViewAudit));
    }

    #[test]
    fn unknown_role_has_nothing() {
        assert_eq!(Capabilities::for_role(Role::Unknown), Capabilities::default());
        assert!(!Capabilities::for_role(Role::Unknown).allows(Capability::ViewDashboard));
    }
}
