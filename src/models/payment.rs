use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{
    NewPayment as DomainNewPayment, Payment as DomainPayment, UpdatePayment as DomainUpdatePayment,
};
use crate::domain::types::{
    ClinicalRecordId, PaymentId, PaymentTypeId, StaffId, TypeConstraintError,
};
use crate::models::fields;

/// Wire model of [`crate::domain::payment::Payment`].
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: i32,
    pub hist_clin: i32,
    pub tipo_pago: i32,
    #[serde(default)]
    pub pagado: bool,
    #[serde(default, deserialize_with = "fields::optional_date")]
    pub fecha_pago: Option<NaiveDate>,
    #[serde(default)]
    pub registrado_por: Option<i32>,
    #[serde(default)]
    pub registrado_por_nombre: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NewPayment {
    pub hist_clin: i32,
    pub tipo_pago: i32,
    pub pagado: bool,
    pub registrado_por: i32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UpdatePayment {
    pub pagado: bool,
    pub registrado_por: i32,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(row: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::new(row.id)?,
            record_id: ClinicalRecordId::new(row.hist_clin)?,
            payment_type_id: PaymentTypeId::new(row.tipo_pago)?,
            paid: row.pagado,
            paid_on: row.fecha_pago,
            registered_by: row.registrado_por.map(StaffId::new).transpose()?,
            registered_by_name: row.registrado_por_nombre,
        })
    }
}

impl From<&DomainNewPayment> for NewPayment {
    fn from(payment: &DomainNewPayment) -> Self {
        Self {
            hist_clin: payment.record_id.get(),
            tipo_pago: payment.payment_type_id.get(),
            pagado: payment.paid,
            registrado_por: payment.registered_by.get(),
        }
    }
}

impl From<&DomainUpdatePayment> for UpdatePayment {
    fn from(update: &DomainUpdatePayment) -> Self {
        Self {
            pagado: update.paid,
            registrado_por: update.registered_by.get(),
        }
    }
}
