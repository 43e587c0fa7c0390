use serde::Deserialize;

use crate::domain::types::{PaymentId, PaymentTypeId};
use crate::forms::{FormError, checkbox, parse_optional_id};

/// One checkbox row of the payment plan.
#[derive(Debug, Deserialize)]
pub struct TogglePaymentForm {
    pub payment_type_id: i32,
    pub payment_id: Option<String>,
    pub paid: Option<String>,
}

impl TogglePaymentForm {
    pub fn parse(&self) -> Result<(PaymentTypeId, Option<PaymentId>, bool), FormError> {
        Ok((
            PaymentTypeId::new(self.payment_type_id)?,
            parse_optional_id(self.payment_id.as_deref())?
                .map(PaymentId::new)
                .transpose()?,
            checkbox(self.paid.as_deref()),
        ))
    }
}
