use serde::Serialize;

use crate::domain::catalog::{Tooth, ToothSurface, Treatment};
use crate::domain::clinical_record::{ClinicalRecord, TreatmentDetail};
use crate::domain::patient::Patient;
use crate::domain::payment::PaymentPlanRow;
use crate::domain::treatment_plan::DetailLock;
use crate::domain::types::{ClinicalRecordId, TreatmentId};

/// State of the record editor between round trips.
#[derive(Debug, Serialize)]
pub struct RecordEditorData {
    pub patient: Patient,
    /// `None` while creating.
    pub record_id: Option<ClinicalRecordId>,
    pub description: String,
    pub finalized: bool,
    pub details: Vec<TreatmentDetail>,
    pub lock: DetailLock,
    pub selectable_treatments: Vec<Treatment>,
    pub teeth: Vec<Tooth>,
    pub surfaces: Vec<ToothSurface>,
    /// Lets the form hide tooth and surface for consultations.
    pub consultation_id: Option<TreatmentId>,
    pub warning: Option<String>,
}

/// Result of posting the record editor.
#[derive(Debug)]
pub enum DraftOutcome {
    /// Detail added or removed (or rejected); render the editor again.
    Editing(Box<RecordEditorData>),
    Saved(ClinicalRecord),
}

/// Clinical record with its follow-ups and payment plan.
#[derive(Debug, Serialize)]
pub struct RecordPageData {
    pub record: ClinicalRecord,
    /// Present when the user may manage payments.
    pub payment_plan: Option<Vec<PaymentPlanRow>>,
    pub can_edit: bool,
}
