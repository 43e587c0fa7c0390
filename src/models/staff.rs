use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItem;
use crate::domain::staff::{
    NewStaffMember as DomainNewStaffMember, PasswordChange as DomainPasswordChange,
    ProfileUpdate as DomainProfileUpdate, StaffMember as DomainStaffMember,
};
use crate::domain::types::{StaffId, TypeConstraintError};
use crate::models::catalog::CatalogRow;
use crate::models::fields;

/// Wire model of [`crate::domain::staff::StaffMember`], also returned by `personal/me/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffMember {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    #[serde(deserialize_with = "fields::text")]
    pub dni: String,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub domicilio: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub matricula: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub username: Option<String>,
    #[serde(default)]
    pub puesto_info: Option<CatalogRow>,
    #[serde(default)]
    pub especialidades_info: Vec<CatalogRow>,
    #[serde(default)]
    pub fecha_alta: Option<NaiveDate>,
    #[serde(default = "fields::default_true")]
    pub activo: bool,
}

/// Body posted on create and update of a staff member.
#[derive(Debug, Serialize)]
pub struct NewStaffMember<'a> {
    pub nombre: &'a str,
    pub apellido: &'a str,
    pub dni: &'a str,
    pub telefono: Option<&'a str>,
    pub email: &'a str,
    pub domicilio: Option<&'a str>,
    pub matricula: Option<&'a str>,
    pub puesto_id: i32,
    pub especialidades_ids: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_input: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdate<'a> {
    pub telefono: Option<&'a str>,
    pub email: &'a str,
    pub domicilio: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct PasswordChange<'a> {
    pub current_password: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StaffActivity {
    pub activo: bool,
}

impl TryFrom<StaffMember> for DomainStaffMember {
    type Error = TypeConstraintError;

    fn try_from(row: StaffMember) -> Result<Self, Self::Error> {
        Ok(Self {
            id: StaffId::new(row.id)?,
            dni: row.dni,
            first_name: row.nombre,
            last_name: row.apellido,
            phone: row.telefono,
            email: row.email,
            address: row.domicilio,
            license_number: row.matricula,
            username: row.username,
            position: row.puesto_info.map(CatalogItem::try_from).transpose()?,
            specialties: row
                .especialidades_info
                .into_iter()
                .map(CatalogItem::try_from)
                .collect::<Result<_, _>>()?,
            hired_on: row.fecha_alta,
            active: row.activo,
        })
    }
}

impl<'a> From<&'a DomainNewStaffMember> for NewStaffMember<'a> {
    fn from(member: &'a DomainNewStaffMember) -> Self {
        Self {
            nombre: member.first_name.as_str(),
            apellido: member.last_name.as_str(),
            dni: member.dni.as_str(),
            telefono: member.phone.as_ref().map(|p| p.as_str()),
            email: member.email.as_str(),
            domicilio: member.address.as_deref(),
            matricula: member.license_number.as_deref(),
            puesto_id: member.position_id.get(),
            especialidades_ids: member.specialty_ids.iter().map(|id| id.get()).collect(),
            username_input: member.username.as_ref().map(|u| u.as_str()),
            password: member.password.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainProfileUpdate> for ProfileUpdate<'a> {
    fn from(update: &'a DomainProfileUpdate) -> Self {
        Self {
            telefono: update.phone.as_ref().map(|p| p.as_str()),
            email: update.email.as_str(),
            domicilio: update.address.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainPasswordChange> for PasswordChange<'a> {
    fn from(change: &'a DomainPasswordChange) -> Self {
        Self {
            current_password: change.current_password.as_str(),
            password: change.new_password.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capabilities::Role;
    use crate::domain::types::{CatalogItemId, Dni, Email, PersonName, Username};

    #[test]
    fn me_response_into_domain() {
        let json = r#"{
            "id": 3,
            "nombre": "Laura",
            "apellido": "Gómez",
            "dni": "20111222",
            "email": "laura@example.com",
            "matricula": 4455,
            "puesto_info": {"id": 2, "nombre_puesto": "Odontólogo/a"},
            "especialidades_info": [{"id": 1, "nombre_esp": "Ortodoncia"}],
            "fecha_alta": "2020-03-01"
        }"#;
        let row: StaffMember = serde_json::from_str(json).unwrap();
        let member = DomainStaffMember::try_from(row).unwrap();

        assert_eq!(member.role(), Role::Dentist);
        assert_eq!(member.license_number.as_deref(), Some("4455"));
        assert_eq!(member.specialties[0].name.as_str(), "Ortodoncia");
        assert!(member.active);
    }

    #[test]
    fn credentials_are_only_sent_when_present() {
        let mut domain = DomainNewStaffMember {
            dni: Dni::new("20111222").unwrap(),
            first_name: PersonName::new("Laura").unwrap(),
            last_name: PersonName::new("Gómez").unwrap(),
            phone: None,
            email: Email::new("laura@example.com").unwrap(),
            address: None,
            license_number: None,
            position_id: CatalogItemId::new(2).unwrap(),
            specialty_ids: vec![],
            username: None,
            password: None,
        };

        let json = serde_json::to_value(NewStaffMember::from(&domain)).unwrap();
        assert!(json.get("username_input").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["puesto_id"], 2);

        domain.username = Some(Username::new("lgomez").unwrap());
        domain.password = Some("secreto123".to_string());
        let json = serde_json::to_value(NewStaffMember::from(&domain)).unwrap();
        assert_eq!(json["username_input"], "lgomez");
        assert_eq!(json["password"], "secreto123");
    }

    #[test]
    fn password_change_uses_backend_names() {
        let change = DomainPasswordChange {
            current_password: "old".to_string(),
            new_password: "new-password".to_string(),
        };
        let json = serde_json::to_value(PasswordChange::from(&change)).unwrap();
        assert_eq!(json["current_password"], "old");
        assert_eq!(json["password"], "new-password");
    }
}
