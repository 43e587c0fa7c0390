use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItem;
use crate::domain::types::{
    CatalogItemId, Dni, Email, PatientId, PersonName, PhoneNumber, fold_name,
};

/// Health insurer membership of a patient.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientInsurance {
    pub insurer: CatalogItem,
    pub member_number: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gender: Option<CatalogItem>,
    pub active: bool,
    pub insurances: Vec<PatientInsurance>,
    pub antecedents: Vec<CatalogItem>,
    pub functional_analyses: Vec<CatalogItem>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case and accent insensitive match on name or DNI.
    pub fn matches(&self, query: &str) -> bool {
        let query = fold_name(query);
        if query.is_empty() {
            return true;
        }
        fold_name(&self.full_name()).contains(&query)
            || fold_name(&format!("{} {}", self.last_name, self.first_name)).contains(&query)
            || self.dni.contains(&query)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatientInsurance {
    pub insurer_id: CatalogItemId,
    pub member_number: String,
}

/// Patient data posted on create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatient {
    pub dni: Dni,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub birth_date: NaiveDate,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
    pub address: Option<String>,
    pub gender_id: Option<CatalogItemId>,
    pub antecedent_ids: Vec<CatalogItemId>,
    pub functional_analysis_ids: Vec<CatalogItemId>,
    pub insurances: Vec<NewPatientInsurance>,
}
