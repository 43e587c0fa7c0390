use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItem;
use crate::domain::patient::{
    NewPatient as DomainNewPatient, Patient as DomainPatient, PatientInsurance,
};
use crate::domain::types::{PatientId, TypeConstraintError};
use crate::models::catalog::CatalogRow;
use crate::models::fields;

#[derive(Debug, Clone, Deserialize)]
pub struct InsuranceRow {
    pub os_info: CatalogRow,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub num_afiliado: Option<String>,
}

/// Wire model of [`crate::domain::patient::Patient`].
#[derive(Debug, Clone, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    #[serde(deserialize_with = "fields::text")]
    pub dni: String,
    #[serde(default)]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default)]
    pub edad: Option<u32>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub domicilio: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "fields::optional_text")]
    pub email: Option<String>,
    #[serde(default = "fields::default_true")]
    pub activo: bool,
    #[serde(default)]
    pub genero_info: Option<CatalogRow>,
    #[serde(default)]
    pub antecedentes_info: Vec<CatalogRow>,
    #[serde(default)]
    pub analisis_funcional_info: Vec<CatalogRow>,
    #[serde(default)]
    pub os_pacientes_info: Vec<InsuranceRow>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NewInsurance<'a> {
    pub os_id: i32,
    pub num_afiliado: &'a str,
}

/// Body posted on create and update of a patient.
#[derive(Debug, Serialize)]
pub struct NewPatient<'a> {
    pub nombre: &'a str,
    pub apellido: &'a str,
    pub dni: &'a str,
    pub fecha_nacimiento: NaiveDate,
    pub telefono: Option<&'a str>,
    pub email: Option<&'a str>,
    pub domicilio: Option<&'a str>,
    pub genero_id: Option<i32>,
    pub antecedentes_ids: Vec<i32>,
    pub analisis_funcional_ids: Vec<i32>,
    pub os_pacientes_data: Vec<NewInsurance<'a>>,
}

/// Body of the activate / deactivate toggle.
#[derive(Debug, Serialize)]
pub struct PatientActivity {
    pub activo: bool,
}

impl TryFrom<Patient> for DomainPatient {
    type Error = TypeConstraintError;

    fn try_from(row: Patient) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PatientId::new(row.id)?,
            dni: row.dni,
            first_name: row.nombre,
            last_name: row.apellido,
            birth_date: row.fecha_nacimiento,
            age: row.edad,
            phone: row.telefono,
            email: row.email,
            address: row.domicilio,
            gender: row.genero_info.map(CatalogItem::try_from).transpose()?,
            active: row.activo,
            insurances: row
                .os_pacientes_info
                .into_iter()
                .map(|insurance| {
                    Ok(PatientInsurance {
                        insurer: insurance.os_info.try_into()?,
                        member_number: insurance.num_afiliado.unwrap_or_default(),
                    })
                })
                .collect::<Result<_, TypeConstraintError>>()?,
            antecedents: row
                .antecedentes_info
                .into_iter()
                .map(CatalogItem::try_from)
                .collect::<Result<_, _>>()?,
            functional_analyses: row
                .analisis_funcional_info
                .into_iter()
                .map(CatalogItem::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl<'a> From<&'a DomainNewPatient> for NewPatient<'a> {
    fn from(patient: &'a DomainNewPatient) -> Self {
        Self {
            nombre: patient.first_name.as_str(),
            apellido: patient.last_name.as_str(),
            dni: patient.dni.as_str(),
            fecha_nacimiento: patient.birth_date,
            telefono: patient.phone.as_ref().map(|p| p.as_str()),
            email: patient.email.as_ref().map(|e| e.as_str()),
            domicilio: patient.address.as_deref(),
            genero_id: patient.gender_id.map(i32::from),
            antecedentes_ids: patient.antecedent_ids.iter().map(|id| id.get()).collect(),
            analisis_funcional_ids: patient
                .functional_analysis_ids
                .iter()
                .map(|id| id.get())
                .collect(),
            os_pacientes_data: patient
                .insurances
                .iter()
                .map(|insurance| NewInsurance {
                    os_id: insurance.insurer_id.get(),
                    num_afiliado: insurance.member_number.as_str(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::NewPatientInsurance;
    use crate::domain::types::{CatalogItemId, Dni, Email, PersonName, PhoneNumber};

    const PATIENT_JSON: &str = r#"{
        "id": 7,
        "nombre": "María",
        "apellido": "Núñez",
        "dni": 30123456,
        "fecha_nacimiento": "1990-04-02",
        "edad": 34,
        "domicilio": "",
        "telefono": "+5493815551234",
        "email": "maria@example.com",
        "activo": false,
        "genero_info": {"id": 2, "nombre_ge": "Femenino"},
        "antecedentes_info": [{"id": 1, "nombre_ant": "Diabetes"}],
        "analisis_funcional_info": [],
        "os_pacientes_info": [{"os_info": {"id": 5, "nombre_os": "OSDE"}, "num_afiliado": "A-1"}]
    }"#;

    #[test]
    fn patient_into_domain() {
        let row: Patient = serde_json::from_str(PATIENT_JSON).unwrap();
        let patient = DomainPatient::try_from(row).unwrap();

        assert_eq!(patient.id.get(), 7);
        assert_eq!(patient.dni, "30123456");
        assert_eq!(patient.full_name(), "María Núñez");
        assert_eq!(patient.address, None);
        assert!(!patient.active);
        assert_eq!(patient.gender.unwrap().name.as_str(), "Femenino");
        assert_eq!(patient.antecedents.len(), 1);
        assert_eq!(patient.insurances[0].insurer.name.as_str(), "OSDE");
        assert_eq!(patient.insurances[0].member_number, "A-1");
    }

    #[test]
    fn patient_with_invalid_id_is_rejected() {
        let row: Patient = serde_json::from_str(&PATIENT_JSON.replace("\"id\": 7", "\"id\": 0")).unwrap();
        assert_eq!(
            DomainPatient::try_from(row),
            Err(TypeConstraintError::NonPositiveId)
        );
    }

    #[test]
    fn from_domain_new_creates_payload() {
        let domain = DomainNewPatient {
            dni: Dni::new("30123456").unwrap(),
            first_name: PersonName::new("Juan").unwrap(),
            last_name: PersonName::new("Pérez").unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1985, 1, 20).unwrap(),
            phone: Some(PhoneNumber::new("381 555-1234").unwrap()),
            email: Some(Email::new("juan@example.com").unwrap()),
            address: None,
            gender_id: CatalogItemId::new(1).ok(),
            antecedent_ids: vec![CatalogItemId::new(3).unwrap()],
            functional_analysis_ids: vec![],
            insurances: vec![NewPatientInsurance {
                insurer_id: CatalogItemId::new(5).unwrap(),
                member_number: "A-1".to_string(),
            }],
        };

        let payload = NewPatient::from(&domain);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["nombre"], "Juan");
        assert_eq!(json["dni"], "30123456");
        assert_eq!(json["fecha_nacimiento"], "1985-01-20");
        assert_eq!(json["genero_id"], 1);
        assert_eq!(json["antecedentes_ids"], serde_json::json!([3]));
        assert_eq!(
            json["os_pacientes_data"],
            serde_json::json!([{"os_id": 5, "num_afiliado": "A-1"}])
        );
    }
}
