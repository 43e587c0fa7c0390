use serde::Serialize;

use crate::domain::appointment::Appointment;
use crate::domain::catalog::CatalogItem;
use crate::domain::clinical_record::ClinicalRecord;
use crate::domain::odontogram::ToothVisualState;
use crate::domain::patient::Patient;
use crate::domain::types::ToothNumber;
use crate::pagination::Paginated;

/// Data required to render the patient list.
#[derive(Debug, Serialize)]
pub struct PatientsPageData {
    pub patients: Paginated<Patient>,
    pub search_query: Option<String>,
    pub show_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct ChartTooth {
    pub code: ToothNumber,
    pub state: ToothVisualState,
}

/// Patient file: personal data, history, chart and agenda.
#[derive(Debug, Serialize)]
pub struct PatientPageData {
    pub patient: Patient,
    pub records: Vec<ClinicalRecord>,
    pub chart: Vec<Vec<ChartTooth>>,
    pub appointments: Vec<Appointment>,
}

/// Select options of the patient form, plus the patient when editing.
#[derive(Debug, Serialize)]
pub struct PatientFormData {
    pub patient: Option<Patient>,
    pub genders: Vec<CatalogItem>,
    pub antecedents: Vec<CatalogItem>,
    pub functional_analyses: Vec<CatalogItem>,
    pub insurers: Vec<CatalogItem>,
}
