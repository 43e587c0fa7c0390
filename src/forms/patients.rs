use serde::Deserialize;

use crate::domain::patient::{NewPatient, NewPatientInsurance};
use crate::domain::types::{CatalogItemId, Dni, Email, PersonName, PhoneNumber};
use crate::forms::{FormError, non_blank, parse_date, parse_optional_id};

/// Patient list filters.
#[derive(Debug, Default, Deserialize)]
pub struct PatientsQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    /// Include deactivated patients.
    pub inactive: Option<String>,
}

/// Create and edit form of a patient.
///
/// Insurances arrive as parallel `insurer_id` / `member_number` lists, one
/// pair per row of the form.
#[derive(Debug, Default, Deserialize)]
pub struct PatientForm {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub gender_id: Option<String>,
    #[serde(default)]
    pub antecedent_ids: Vec<i32>,
    #[serde(default)]
    pub functional_analysis_ids: Vec<i32>,
    #[serde(default)]
    pub insurer_id: Vec<String>,
    #[serde(default)]
    pub member_number: Vec<String>,
}

fn catalog_ids(ids: &[i32]) -> Result<Vec<CatalogItemId>, FormError> {
    let mut ids = ids
        .iter()
        .map(|&id| CatalogItemId::new(id))
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

impl TryFrom<PatientForm> for NewPatient {
    type Error = FormError;

    fn try_from(form: PatientForm) -> Result<Self, Self::Error> {
        let mut insurances: Vec<NewPatientInsurance> = Vec::new();
        for (insurer, member_number) in form.insurer_id.iter().zip(form.member_number.iter()) {
            let Some(insurer_id) = parse_optional_id(Some(insurer.as_str()))? else {
                continue;
            };
            let insurer_id = CatalogItemId::new(insurer_id)?;
            if insurances.iter().any(|i| i.insurer_id == insurer_id) {
                continue;
            }
            insurances.push(NewPatientInsurance {
                insurer_id,
                member_number: member_number.trim().to_string(),
            });
        }

        Ok(NewPatient {
            dni: Dni::new(form.dni)?,
            first_name: PersonName::new(form.first_name)?,
            last_name: PersonName::new(form.last_name)?,
            birth_date: parse_date(&form.birth_date)?,
            phone: non_blank(&form.phone).map(PhoneNumber::new).transpose()?,
            email: non_blank(&form.email).map(Email::new).transpose()?,
            address: non_blank(&form.address),
            gender_id: parse_optional_id(form.gender_id.as_deref())?
                .map(CatalogItemId::new)
                .transpose()?,
            antecedent_ids: catalog_ids(&form.antecedent_ids)?,
            functional_analysis_ids: catalog_ids(&form.functional_analysis_ids)?,
            insurances,
        })
    }
}
