use serde::Serialize;

use crate::domain::clinical_record::ClinicalRecord;
use crate::domain::payment::PaymentPlanRow;

/// Payment plan of one clinical record.
#[derive(Debug, Serialize)]
pub struct PaymentPlanData {
    pub record: ClinicalRecord,
    pub rows: Vec<PaymentPlanRow>,
}
